//! Outcomes of catalog operations.
//!
//! Every mutation on [`crate::Library`] yields either a [`Success`] or a
//! [`LibraryError`]. Both render as the human readable message shown to the
//! caller, and [`Status`] folds the pair into `(succeeded, message)`.

use std::fmt;

use thiserror::Error;

/// Result type for catalog operations
pub type LibraryResult<T = Success> = Result<T, LibraryError>;

/// Reasons a catalog operation can be refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    /// No book is catalogued under the ISBN
    #[error("Book not found")]
    BookNotFound { isbn: String },

    /// No member is registered under the ID
    #[error("Member not found")]
    MemberNotFound { member_id: String },

    /// The genre name is not one of the accepted genres
    #[error("Invalid genre. Must be one of {}", crate::genre::Genre::accepted_names())]
    InvalidGenre(String),

    /// A book with the ISBN is already catalogued
    #[error("ISBN already exists")]
    DuplicateIsbn { isbn: String },

    /// A member with the ID is already registered
    #[error("Member ID already exists")]
    DuplicateMember { member_id: String },

    /// Copies of the book are still out on loan
    #[error("Cannot delete book with borrowed copies")]
    BookOnLoan { isbn: String, loans: u32 },

    /// The member still holds borrowed books
    #[error("Cannot delete member with borrowed books")]
    MemberHasLoans { member_id: String, loans: usize },

    /// The member already holds as many books as allowed
    #[error("Member has reached borrowing limit ({limit} books)")]
    BorrowLimitReached { member_id: String, limit: usize },

    /// Every copy of the book is on loan
    #[error("No copies available")]
    NoCopiesAvailable { isbn: String },

    /// The member already holds a copy of the book
    #[error("Member already borrowed this book")]
    AlreadyBorrowed { member_id: String, isbn: String },

    /// The member does not hold a copy of the book
    #[error("Member has not borrowed this book")]
    NotBorrowed { member_id: String, isbn: String },

    /// An update would leave more copies available than exist
    #[error("Available copies cannot exceed total copies")]
    AvailableExceedsTotal { available: u32, total: u32 },

    /// An update would lose track of copies that are on loan
    #[error("Copy counts conflict with {loans} outstanding loan(s)")]
    OutstandingLoans { isbn: String, loans: u32 },

    /// The catalog could not be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Broad category of a [`LibraryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An ISBN or member ID does not exist
    NotFound,
    /// A field value is not acceptable
    Validation,
    /// The operation would break a catalog constraint
    Constraint,
    /// The request does not match the current lending state
    StateMismatch,
    /// Output could not be produced
    Serialization,
}

impl LibraryError {
    /// Categorize the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookNotFound { .. } | Self::MemberNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidGenre(_)
            | Self::AvailableExceedsTotal { .. }
            | Self::OutstandingLoans { .. } => ErrorKind::Validation,
            Self::DuplicateIsbn { .. }
            | Self::DuplicateMember { .. }
            | Self::BookOnLoan { .. }
            | Self::MemberHasLoans { .. }
            | Self::BorrowLimitReached { .. }
            | Self::NoCopiesAvailable { .. } => ErrorKind::Constraint,
            Self::AlreadyBorrowed { .. } | Self::NotBorrowed { .. } => ErrorKind::StateMismatch,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

/// Successful catalog operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Success {
    /// A book was catalogued
    BookAdded,
    /// A book's details changed
    BookUpdated,
    /// A book was removed from the catalog
    BookDeleted,
    /// A member was registered
    MemberAdded,
    /// A member's details changed
    MemberUpdated,
    /// A member was removed
    MemberDeleted,
    /// A copy went out on loan
    BookBorrowed,
    /// A copy came back
    BookReturned,
}

impl fmt::Display for Success {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::BookAdded => "Book added successfully",
            Self::BookUpdated => "Book updated successfully",
            Self::BookDeleted => "Book deleted successfully",
            Self::MemberAdded => "Member added successfully",
            Self::MemberUpdated => "Member updated successfully",
            Self::MemberDeleted => "Member deleted successfully",
            Self::BookBorrowed => "Book borrowed successfully",
            Self::BookReturned => "Book returned successfully",
        };
        f.write_str(message)
    }
}

/// Collapse an operation result into a success flag and a message
pub trait Status {
    /// `(true, message)` on success, `(false, reason)` on failure
    fn status(&self) -> (bool, String);

    /// The message half of [`Status::status`]
    fn message(&self) -> String {
        self.status().1
    }
}

impl Status for LibraryResult {
    fn status(&self) -> (bool, String) {
        match self {
            Ok(success) => (true, success.to_string()),
            Err(err) => (false, err.to_string()),
        }
    }
}
