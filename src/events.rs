use serde::{Deserialize, Serialize};

/// Successful mutations of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum CatalogEvent {
    /// A title was catalogued
    BookAdded { isbn: String },
    /// A title's details changed
    BookUpdated { isbn: String },
    /// A title was removed
    BookDeleted { isbn: String },
    /// A member was registered
    MemberAdded { member_id: String },
    /// A member's details changed
    MemberUpdated { member_id: String },
    /// A member was removed
    MemberDeleted { member_id: String },
    /// A member took a copy
    BookBorrowed { member_id: String, isbn: String },
    /// A member brought a copy back
    BookReturned { member_id: String, isbn: String },
}

impl CatalogEvent {
    /// The ISBN the event concerns, if any
    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        match self {
            Self::BookAdded { isbn }
            | Self::BookUpdated { isbn }
            | Self::BookDeleted { isbn }
            | Self::BookBorrowed { isbn, .. }
            | Self::BookReturned { isbn, .. } => Some(isbn.as_str()),
            Self::MemberAdded { .. } | Self::MemberUpdated { .. } | Self::MemberDeleted { .. } => {
                None
            }
        }
    }

    /// The member the event concerns, if any
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        match self {
            Self::MemberAdded { member_id }
            | Self::MemberUpdated { member_id }
            | Self::MemberDeleted { member_id }
            | Self::BookBorrowed { member_id, .. }
            | Self::BookReturned { member_id, .. } => Some(member_id.as_str()),
            Self::BookAdded { .. } | Self::BookUpdated { .. } | Self::BookDeleted { .. } => None,
        }
    }
}
