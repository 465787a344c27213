//! Domain layer: the element tree and its text form
//!
//! This layer is independent of external concerns (no file I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod path;
pub mod serializer;
pub mod snapshot;

pub use arena::{Ancestors, Descendants, NodeId, NodeRef, XmlArena};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use path::NodePath;
pub use serializer::{XmlLines, XmlTags, XmlWriter, XML_DECLARATION};
pub use snapshot::{ElementSnapshot, SnapshotRecord};
