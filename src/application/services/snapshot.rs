//! Tree snapshot persistence
//!
//! Saves a constructed tree to a JSON file and loads it back into a fresh
//! arena, so sample trees can be reused across runs.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{ElementSnapshot, NodeId, XmlArena};
use crate::infrastructure::traits::FileSystem;

/// Snapshot persistence service.
pub struct SnapshotService {
    fs: Arc<dyn FileSystem>,
}

impl SnapshotService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Write the tree rooted at `root` to `path` as pretty-printed JSON.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn save(&self, arena: &XmlArena, root: NodeId, path: &Path) -> ApplicationResult<()> {
        let snapshot = arena.snapshot(root)?;
        let mut json = serde_json::to_string_pretty(&snapshot).with_snapshot_path(path)?;
        json.push('\n');

        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        self.fs
            .write(path, &json)
            .with_path_context("write snapshot", path)?;
        debug!(elements = snapshot.size(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot and rebuild it as the only tree of a new arena.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<(XmlArena, NodeId)> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        let snapshot: ElementSnapshot = serde_json::from_str(&content).with_snapshot_path(path)?;

        let mut arena = XmlArena::with_capacity(snapshot.size());
        let root = arena.restore(&snapshot)?;
        debug!(elements = arena.len(), "snapshot loaded");
        Ok((arena, root))
    }
}
