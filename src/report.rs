//! Rendering of a scene graph as an indented triangle report
//!
//! ```text
//! + Strecke/Bahnhof.ls3: 1200
//! | - %0 (Boden): 200
//! | + Strecke/Signal.ls3: 500 (Ani)
//! | | - %0: 500
//! | + Strecke/Signal.ls3: 500
//! ```
//!
//! A file reached more than once is expanded on its first appearance only;
//! later appearances print the summary line alone.

use crate::graph::SceneGraph;
use crate::model::SceneId;
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

const INDENT: &str = "| ";
const ANIMATED_MARKER: &str = " (Ani)";

/// Depth-first printer for a [`SceneGraph`]
#[derive(Debug, Clone, Default)]
pub struct TreePrinter {
    data_root: Option<PathBuf>,
}

impl TreePrinter {
    /// Create a printer that shows absolute paths
    pub fn new() -> Self {
        Self::default()
    }

    /// Show paths below `data_root` relative to it
    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = Some(data_root.into());
        self
    }

    /// Render the tree below `root` into a string
    pub fn render(&self, graph: &SceneGraph, root: SceneId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_tree(&mut out, graph, root);
        out
    }

    /// Write the tree below `root` to `out`
    pub fn write_tree<W: Write>(
        &self,
        out: &mut W,
        graph: &SceneGraph,
        root: SceneId,
    ) -> fmt::Result {
        let mut expanded = HashSet::new();
        self.write_node(out, graph, root, 0, false, &mut expanded)
    }

    fn write_node<W: Write>(
        &self,
        out: &mut W,
        graph: &SceneGraph,
        id: SceneId,
        depth: usize,
        animated: bool,
        expanded: &mut HashSet<SceneId>,
    ) -> fmt::Result {
        let file = &graph[id];
        writeln!(
            out,
            "{}+ {}: {}{}",
            INDENT.repeat(depth),
            self.display_path(&file.path).display(),
            file.total_triangle_count,
            marker(animated)
        )?;

        if !expanded.insert(id) {
            return Ok(());
        }

        let detail_indent = INDENT.repeat(depth + 1);
        for (index, subset) in file.subsets.iter().enumerate() {
            write!(out, "{}- %{}", detail_indent, index)?;
            if let Some(name) = &subset.name {
                write!(out, " ({})", name)?;
            }
            writeln!(out, ": {}{}", subset.triangle_count, marker(subset.animated))?;
        }

        for link in &file.linked_files {
            self.write_node(out, graph, link.file, depth + 1, link.animated, expanded)?;
        }
        Ok(())
    }

    fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        self.data_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path)
    }
}

fn marker(animated: bool) -> &'static str {
    if animated { ANIMATED_MARKER } else { "" }
}
