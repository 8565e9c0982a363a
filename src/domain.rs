//! Domain models for the library catalog.
//!
//! This module contains the record types (libraries, items, members and
//! borrowings), the in-memory [`Catalog`] with its business rules, and
//! configuration.

mod borrowing;
pub use borrowing::{Borrowing, BorrowingId, BorrowingState, InvalidBorrowingId};

/// Catalog state and the add/edit/delete rules.
pub mod catalog;
pub use catalog::{Catalog, Entity, Rejection};

mod circulation;

mod config;
pub use config::Config;

mod field;
pub use field::{FieldProblem, DELIMITER, NULL_MARKER};

/// Catalog items and their types.
pub mod item;
pub use item::{Item, ItemKind, ItemType};

mod library;
pub use library::Library;

mod member;
pub use member::Member;
