use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};

/// A registered borrower
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Member {
    /// Unique key, never changes once registered
    pub member_id: String,
    /// Full name
    pub name: String,
    /// Contact address
    pub email: String,
    /// ISBNs on loan to this member, oldest first, no duplicates
    pub borrowed_books: Vec<String>,
}

impl Member {
    /// Register a member with nothing on loan
    #[must_use]
    pub fn new(member_id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            name: name.into(),
            email: email.into(),
            borrowed_books: Vec::new(),
        }
    }

    /// Whether the member may take another book under `limit`
    #[must_use]
    pub fn can_borrow(&self, limit: usize) -> bool {
        self.borrowed_books.len() < limit
    }

    /// Whether the member currently holds the ISBN
    #[must_use]
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_books.iter().any(|held| held == isbn)
    }

    /// Record a loan; a duplicate ISBN is not added twice
    pub(crate) fn borrow(&mut self, isbn: &str) {
        if !self.has_borrowed(isbn) {
            self.borrowed_books.push(isbn.to_string());
        }
    }

    /// Forget a loan; an ISBN that is not held is ignored
    pub(crate) fn give_back(&mut self, isbn: &str) {
        self.borrowed_books.retain(|held| held != isbn);
    }

    /// Overwrite the contact details named in the patch
    pub(crate) fn apply(&mut self, update: &MemberUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            self.email.clone_from(email);
        }
    }
}

/// Partial update of a member's details
///
/// Only contact details are patchable. The member ID and the borrowed list
/// are owned by the library, so requests naming them are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemberUpdate {
    /// New full name
    pub name: Option<String>,
    /// New contact address
    pub email: Option<String>,
}

impl MemberUpdate {
    /// An empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Build a patch from attribute name/value pairs, skipping unknown names
    #[must_use]
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut update = Self::default();
        for (name, value) in fields {
            match name.as_ref() {
                "name" => update.name = Some(value.as_ref().to_string()),
                "email" => update.email = Some(value.as_ref().to_string()),
                _ => {}
            }
        }
        update
    }

    /// Build a patch from a JSON object, ignoring unknown keys
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the text is not an object or a known key
    /// holds a value of the wrong type.
    pub fn from_json(json: &str) -> LibraryResult<Self> {
        serde_json::from_str(json).map_err(|e| LibraryError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Member, MemberUpdate};

    #[test]
    fn test_borrow_bookkeeping() {
        let mut member = Member::new("M001", "Alice Johnson", "alice@email.com");
        member.borrow("A");
        member.borrow("B");
        member.borrow("A");
        assert_eq!(member.borrowed_books, vec!["A".to_string(), "B".to_string()]);
        assert!(member.can_borrow(3));
        assert!(!member.can_borrow(2));

        member.give_back("A");
        member.give_back("A");
        assert_eq!(member.borrowed_books, vec!["B".to_string()]);
    }

    #[test]
    fn test_borrowed_books_cannot_be_patched() {
        let update = MemberUpdate::from_json(
            r#"{"member_id": "M999", "email": "new@email.com", "borrowed_books": ["X"]}"#,
        );
        assert_eq!(update, Ok(MemberUpdate::new().email("new@email.com")));

        let update = MemberUpdate::from_fields([("borrowed_books", "X"), ("name", "Alice J.")]);
        assert_eq!(update, MemberUpdate::new().name("Alice J."));
    }
}
