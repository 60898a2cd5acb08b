//! Shared fixtures for scene graph tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use tricount::{DocumentLoader, Error, Result};

/// A directory of scene files on disk
pub struct SceneDir {
    dir: TempDir,
}

impl SceneDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Canonical root of the directory
    pub fn root(&self) -> PathBuf {
        canonical(self.dir.path())
    }

    /// Write `xml` to `name` (relative, `/`-separated) and return its canonical path
    pub fn write(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create scene directory");
        }
        fs::write(&path, xml).expect("Failed to write scene file");
        canonical(&path)
    }
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).expect("Failed to canonicalize")
}

/// Build an LS3 document from subset counts and link references
pub fn ls3(subsets: &[u64], links: &[&str]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Zusi>\n<Landschaft>\n");
    for link in links {
        xml.push_str(&format!(
            "<Verknuepfte><Datei Dateiname=\"{}\"/></Verknuepfte>\n",
            link
        ));
    }
    for count in subsets {
        xml.push_str(&format!("<SubSet MeshI=\"{}\"></SubSet>\n", count * 3));
    }
    xml.push_str("</Landschaft>\n</Zusi>\n");
    xml
}

/// In-memory documents that record how often each path is loaded
#[derive(Clone, Default)]
pub struct MemoryLoader {
    documents: Rc<RefCell<HashMap<PathBuf, String>>>,
    loads: Rc<RefCell<HashMap<PathBuf, usize>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, xml: impl Into<String>) {
        self.documents.borrow_mut().insert(path.into(), xml.into());
    }

    pub fn load_count(&self, path: impl AsRef<Path>) -> usize {
        self.loads
            .borrow()
            .get(path.as_ref())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_loads(&self) -> usize {
        self.loads.borrow().values().sum()
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<String> {
        *self
            .loads
            .borrow_mut()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;
        self.documents
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.documents.borrow().contains_key(path)
    }
}
