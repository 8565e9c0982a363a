//! Flat-file storage for the catalog.

/// The filesystem backed catalog.
pub mod directory;
/// Line encoding of catalog records.
pub mod record;

pub use directory::{
    Directory, LoadError, Loaded, OperationError, SaveAllError, SaveError, Unloaded,
};
pub use record::{MalformedRecord, Record};
