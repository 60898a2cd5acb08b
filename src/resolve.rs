//! Resolution of scene file references to canonical paths
//!
//! LS3 files reference each other with Windows-style paths. A bare file
//! name is relative to the referencing file's directory, while a path with
//! directory components is relative to the data root.

use std::path::{Component, Path, PathBuf};

/// Turns raw reference strings into canonical file paths
pub trait PathResolver {
    /// Resolve `reference` found in a file located in `base_dir`
    fn resolve(&self, reference: &str, base_dir: &Path) -> PathBuf;

    /// Canonical form of a path given on the command line
    fn canonicalize(&self, path: &Path) -> PathBuf {
        canonical_or_normalized(path)
    }
}

/// Default resolver using the current file's directory and a data root
#[derive(Debug, Clone, Default)]
pub struct DataRootResolver {
    data_root: Option<PathBuf>,
}

impl DataRootResolver {
    /// Create a resolver; without a data root every reference is file-relative
    pub fn new(data_root: Option<PathBuf>) -> Self {
        Self { data_root }
    }

    /// The configured data root
    pub fn data_root(&self) -> Option<&Path> {
        self.data_root.as_deref()
    }
}

impl PathResolver for DataRootResolver {
    fn resolve(&self, reference: &str, base_dir: &Path) -> PathBuf {
        let reference = reference.trim().replace('\\', "/");
        let candidate = Path::new(&reference);

        // `\Lok\x.ls3` is rooted at the data root; `\\server\share` is UNC.
        let rooted = reference.starts_with('/') && !reference.starts_with("//");

        let joined = match &self.data_root {
            Some(root) if rooted => root.join(reference.trim_start_matches('/')),
            _ if candidate.is_absolute() => candidate.to_path_buf(),
            Some(root) if reference.contains('/') => root.join(candidate),
            _ => base_dir.join(reference.trim_start_matches('/')),
        };

        canonical_or_normalized(&joined)
    }
}

/// Canonicalize an existing path, or normalize a missing one lexically
pub(crate) fn canonical_or_normalized(path: &Path) -> PathBuf {
    match dunce::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(_) => normalize_lexically(path),
    }
}

/// Remove `.` components and fold `..` into their parent
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
