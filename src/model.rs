//! Data structures representing linked scene files

use std::path::{Path, PathBuf};

/// Default scene file extension (LS3 landscape files)
pub const DEFAULT_EXTENSION: &str = "ls3";

/// Handle to a [`SceneFile`] owned by a [`SceneGraph`](crate::SceneGraph)
///
/// Handles are only meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub(crate) usize);

impl SceneId {
    /// Position of the node in its graph's arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A group of triangles inside one scene file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    /// Number of triangles (`MeshI / 3` plus explicit faces)
    pub triangle_count: u64,
    /// Declared subset name, if any
    pub name: Option<String>,
    /// Whether a mesh animation targets this subset
    pub animated: bool,
}

impl Subset {
    /// Create an unnamed, static subset
    pub fn new(triangle_count: u64) -> Self {
        Self {
            triangle_count,
            name: None,
            animated: false,
        }
    }
}

/// A traversed reference from one scene file to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkedFile {
    /// The referenced node
    pub file: SceneId,
    /// Ordinal of the link element in its document
    pub link_index: usize,
    /// Whether a reference animation targets this link
    pub animated: bool,
}

/// Parse progress of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Registered, children still being parsed
    InProgress,
    /// Totals are final
    Complete,
}

/// One node per distinct canonical scene file path
#[derive(Debug, Clone)]
pub struct SceneFile {
    /// Canonical absolute path, also the deduplication key
    pub path: PathBuf,
    /// Subsets in document order
    pub subsets: Vec<Subset>,
    /// Traversed links in document order
    pub linked_files: Vec<LinkedFile>,
    /// Sum of all subset triangle counts
    pub own_triangle_count: u64,
    /// Own count plus the totals of all linked files
    pub total_triangle_count: u64,
    /// Set when the file could not be opened or parsed
    pub load_failed: bool,
    /// Parse progress
    pub state: ParseState,
}

impl SceneFile {
    /// Create an empty, in-progress node for `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            subsets: Vec::new(),
            linked_files: Vec::new(),
            own_triangle_count: 0,
            total_triangle_count: 0,
            load_failed: false,
            state: ParseState::InProgress,
        }
    }

    /// Whether the node's totals are final
    pub fn is_complete(&self) -> bool {
        self.state == ParseState::Complete
    }

    /// Directory containing this file, used as base for relative references
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Configuration for triangle counting
///
/// # Example
///
/// ```
/// use tricount::CounterConfig;
///
/// let config = CounterConfig::new()
///     .with_data_root("/srv/zusi")
///     .with_extension("LS3");
/// assert!(config.is_scene_file("/srv/zusi/a.ls3".as_ref()));
/// ```
#[derive(Debug, Clone)]
pub struct CounterConfig {
    /// Base directory for data-root relative references and report paths
    pub data_root: Option<PathBuf>,
    /// Scene file extension, compared case-insensitively
    pub extension: String,
}

impl CounterConfig {
    /// Create a configuration with no data root and the `ls3` extension
    pub fn new() -> Self {
        Self {
            data_root: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Set the data root directory
    pub fn with_data_root(mut self, data_root: impl Into<PathBuf>) -> Self {
        self.data_root = Some(data_root.into());
        self
    }

    /// Set the scene file extension (without leading dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Whether `path` carries the scene file extension
    pub fn is_scene_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::new()
    }
}
