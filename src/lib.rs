//! In-memory library catalog tracking books, members and lending state.
//!
//! The [`Library`] owns every book and member and is the only way to mutate
//! them, so the copy-count and borrowing-limit invariants hold after every
//! operation.

pub mod book;
pub mod config;
pub mod error;
pub mod events;
pub mod genre;
pub mod library;
pub mod member;
pub mod observers;
pub mod report;
pub mod timestamp;

pub use book::{Book, BookUpdate};
pub use config::LibraryConfig;
pub use error::{ErrorKind, LibraryError, Status, Success};
pub use events::CatalogEvent;
pub use genre::Genre;
pub use library::{HistoryEntry, Library};
pub use member::{Member, MemberUpdate};
pub use report::CatalogReport;
