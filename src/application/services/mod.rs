//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the FileSystem boundary trait but are themselves
//! concrete structs, not traits.

mod export;
mod snapshot;

pub use export::ExportService;
pub use snapshot::SnapshotService;
