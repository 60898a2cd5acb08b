//! # tricount
//!
//! Triangle load calculator for LS3 scene files.
//!
//! An LS3 file describes a 3D object as a list of triangle subsets and may
//! link to further LS3 files, which in turn may link to others. This crate
//! follows those links, parses every distinct file once, and reports the
//! triangle count of each file including everything it links to.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Streaming XML parsing with `quick-xml`
//! - Shared files (diamond references) are parsed and expanded once
//! - Missing or broken files are reported without aborting the run
//! - Reference cycles are detected instead of recursing forever
//!
//! ## Example
//!
//! ```no_run
//! use tricount::{CounterConfig, TreePrinter, count_triangles};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CounterConfig::new().with_data_root("/srv/zusi");
//! let graph = count_triangles("/srv/zusi/Strecke/Bahnhof.ls3", &config)?;
//!
//! for diagnostic in graph.diagnostics() {
//!     println!("{}", diagnostic);
//! }
//! if let Some(root) = graph.root() {
//!     print!("{}", TreePrinter::new().with_data_root("/srv/zusi").render(&graph, root));
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod parser;
pub mod report;
pub mod resolve;

pub use error::{Error, Result};
pub use graph::{GraphBuilder, SceneGraph};
pub use loader::{DocumentLoader, FileLoader};
pub use model::{CounterConfig, LinkedFile, ParseState, SceneFile, SceneId, Subset};
pub use parser::{LinkRef, ParsedScene};
pub use report::TreePrinter;
pub use resolve::{DataRootResolver, PathResolver};

use std::path::Path;

/// Build the scene graph rooted at `root` from the filesystem
///
/// Shorthand for [`GraphBuilder::new`] followed by [`GraphBuilder::build`].
pub fn count_triangles(root: impl AsRef<Path>, config: &CounterConfig) -> Result<SceneGraph> {
    GraphBuilder::new(config.clone()).build(root)
}
