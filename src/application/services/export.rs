//! XML file export

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{NodeId, XmlArena, XmlWriter};
use crate::infrastructure::traits::FileSystem;

/// Writes serialized trees to files.
pub struct ExportService {
    fs: Arc<dyn FileSystem>,
}

impl ExportService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Serialize the tree at `root` into `path`, replacing any existing file.
    ///
    /// The file handle is dropped, and therefore closed, on every return path.
    #[instrument(level = "debug", skip(self, arena))]
    pub fn write_xml(
        &self,
        arena: &XmlArena,
        root: NodeId,
        path: &Path,
        writer: &XmlWriter,
    ) -> ApplicationResult<()> {
        let node = arena.node(root)?;

        self.fs
            .ensure_parent(path)
            .with_path_context("create directory for", path)?;
        let mut out = self.fs.create(path).with_path_context("create", path)?;
        writer
            .write(node, &mut out)
            .with_path_context("write xml", path)?;
        out.flush().with_path_context("flush", path)?;

        debug!(elements = node.size(), "xml written");
        Ok(())
    }
}
