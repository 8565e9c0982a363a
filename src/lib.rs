//! Plain-text Library Catalog
//!
//! Libraries, items, members and borrowings are kept as comma-separated
//! records in flat files.

pub mod domain;
pub use domain::{
    Borrowing, BorrowingId, BorrowingState, Catalog, Config, Item, ItemKind, ItemType, Library,
    Member, Rejection,
};

/// Filesystem storage for the catalog.
pub mod storage;
pub use storage::{Directory, LoadError, OperationError};
