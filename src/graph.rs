//! Scene file registry and recursive graph builder
//!
//! [`SceneGraph`] is the arena that owns every [`SceneFile`] exactly once,
//! keyed by canonical path. Links between files are [`SceneId`] handles into
//! that arena, so a file referenced from several parents is stored and
//! parsed once.
//!
//! [`GraphBuilder`] fills the arena depth-first. A node is registered before
//! its children are visited, and its totals are finalized only after every
//! child has completed.

use crate::error::{Error, Result};
use crate::loader::{DocumentLoader, FileLoader};
use crate::model::{CounterConfig, LinkedFile, ParseState, SceneFile, SceneId};
use crate::parser::{ParsedScene, parse_scene_xml};
use crate::resolve::{DataRootResolver, PathResolver};
use log::{debug, warn};
use std::collections::HashMap;
use std::ops::Index;
use std::path::{Path, PathBuf};

/// Registry of all scene files discovered during one run
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneFile>,
    by_path: HashMap<PathBuf, SceneId>,
    root: Option<SceneId>,
    diagnostics: Vec<Error>,
}

impl SceneGraph {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a node by id
    pub fn get(&self, id: SceneId) -> Option<&SceneFile> {
        self.nodes.get(id.0)
    }

    /// Look up the node registered for a canonical path
    pub fn find(&self, path: &Path) -> Option<SceneId> {
        self.by_path.get(path).copied()
    }

    /// Root of the last completed build, if any
    pub fn root(&self) -> Option<SceneId> {
        self.root
    }

    /// Number of distinct scene files
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no file has been registered
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (SceneId, &SceneFile)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, file)| (SceneId(index), file))
    }

    /// Non-fatal errors in the order they were encountered
    pub fn diagnostics(&self) -> &[Error] {
        &self.diagnostics
    }

    /// Register an empty node for `path`, or return the existing one
    ///
    /// The boolean is `true` when the node was newly created.
    fn register(&mut self, path: PathBuf) -> (SceneId, bool) {
        if let Some(&id) = self.by_path.get(&path) {
            return (id, false);
        }
        let id = SceneId(self.nodes.len());
        self.by_path.insert(path.clone(), id);
        self.nodes.push(SceneFile::new(path));
        (id, true)
    }

    fn node_mut(&mut self, id: SceneId) -> &mut SceneFile {
        &mut self.nodes[id.0]
    }

    fn report(&mut self, error: Error) {
        warn!("{}", error);
        self.diagnostics.push(error);
    }
}

impl Index<SceneId> for SceneGraph {
    type Output = SceneFile;

    fn index(&self, id: SceneId) -> &SceneFile {
        &self.nodes[id.0]
    }
}

/// Builds a [`SceneGraph`] by recursively parsing linked scene files
///
/// # Example
///
/// ```no_run
/// use tricount::{CounterConfig, GraphBuilder};
///
/// # fn main() -> tricount::Result<()> {
/// let config = CounterConfig::new().with_data_root("/srv/zusi");
/// let graph = GraphBuilder::new(config).build("/srv/zusi/Strecke/Bahnhof.ls3")?;
/// let root = graph.root().expect("build sets the root");
/// println!("{} triangles", graph[root].total_triangle_count);
/// # Ok(())
/// # }
/// ```
pub struct GraphBuilder {
    config: CounterConfig,
    loader: Box<dyn DocumentLoader>,
    resolver: Box<dyn PathResolver>,
    graph: SceneGraph,
}

impl GraphBuilder {
    /// Create a builder reading from the filesystem
    pub fn new(config: CounterConfig) -> Self {
        let resolver = DataRootResolver::new(config.data_root.clone());
        Self {
            config,
            loader: Box::new(FileLoader),
            resolver: Box::new(resolver),
            graph: SceneGraph::new(),
        }
    }

    /// Replace the document loader
    pub fn with_loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Replace the path resolver
    pub fn with_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// The registry built so far
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Consume the builder and return its registry
    pub fn into_graph(self) -> SceneGraph {
        self.graph
    }

    /// Parse the graph rooted at `root` and return the registry
    ///
    /// Fails with [`Error::RootMissing`] when the root file cannot be
    /// loaded; every other failure is recorded as a diagnostic.
    pub fn build(mut self, root: impl AsRef<Path>) -> Result<SceneGraph> {
        let root_path = self.resolver.canonicalize(root.as_ref());
        let id = self.ensure_parsed(&root_path);

        if self.graph[id].load_failed {
            let source = match self.graph.diagnostics.pop() {
                Some(Error::Load { source, .. }) => source,
                Some(other) => Box::new(other),
                None => Box::new(Error::FileNotFound(root_path.clone())),
            };
            return Err(Error::RootMissing {
                path: root_path,
                source,
            });
        }

        self.graph.root = Some(id);
        Ok(self.graph)
    }

    /// Return the node for `path`, parsing it and its links on first sight
    ///
    /// A path already in the registry is returned as is, without touching
    /// storage again.
    pub fn ensure_parsed(&mut self, path: &Path) -> SceneId {
        let (id, created) = self.graph.register(path.to_path_buf());
        if !created {
            return id;
        }

        debug!("Parsing {}", path.display());
        let scene = match self
            .loader
            .load(path)
            .and_then(|xml| parse_scene_xml(&xml))
        {
            Ok(scene) => scene,
            Err(e) => {
                let node = self.graph.node_mut(id);
                node.load_failed = true;
                node.state = ParseState::Complete;
                self.graph.report(Error::load(path, e));
                return id;
            }
        };

        let linked_files = self.link_children(id, &scene);

        let own = scene.own_triangle_count();
        let total = linked_files.iter().fold(own, |sum, link| {
            sum.saturating_add(self.graph[link.file].total_triangle_count)
        });

        let node = self.graph.node_mut(id);
        node.subsets = scene.subsets;
        node.linked_files = linked_files;
        node.own_triangle_count = own;
        node.total_triangle_count = total;
        node.state = ParseState::Complete;

        debug!("{}: {} own, {} total", path.display(), own, total);
        id
    }

    /// Resolve and recurse into the traversable links of one document
    fn link_children(&mut self, id: SceneId, scene: &ParsedScene) -> Vec<LinkedFile> {
        let path = self.graph[id].path.clone();
        let base_dir = self.graph[id].directory().to_path_buf();
        let mut linked_files = Vec::new();

        for link in &scene.links {
            if link.info_only {
                debug!("Skipping info-only link {}", link.reference);
                continue;
            }

            let target = self.resolver.resolve(&link.reference, &base_dir);
            if !self.config.is_scene_file(&target) {
                debug!("Skipping non-scene link {}", target.display());
                continue;
            }
            if !self.loader.exists(&target) {
                self.graph.report(Error::FileNotFound(target));
                continue;
            }

            let child = self.ensure_parsed(&target);
            if !self.graph[child].is_complete() {
                self.graph.report(Error::ReferenceCycle {
                    from: path.clone(),
                    to: target,
                });
                continue;
            }

            linked_files.push(LinkedFile {
                file: child,
                link_index: link.link_index,
                animated: link.animated,
            });
        }

        linked_files
    }
}
