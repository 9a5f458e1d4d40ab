use serde::{Deserialize, Serialize};

use crate::{
    error::{LibraryError, LibraryResult},
    genre::Genre,
};

/// A catalogued title and its copy counts
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Unique key, never changes once catalogued
    pub isbn: String,
    /// Title as shown to patrons
    pub title: String,
    /// Author as shown to patrons
    pub author: String,
    /// Shelf genre
    pub genre: Genre,
    /// Copies the library owns
    pub total_copies: u32,
    /// Copies on the shelf, never more than `total_copies`
    pub available_copies: u32,
}

impl Book {
    /// Catalogue a new title with every copy on the shelf
    #[must_use]
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: Genre,
        total_copies: u32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            genre,
            total_copies,
            available_copies: total_copies,
        }
    }

    /// Number of copies currently out on loan
    #[must_use]
    pub fn loans(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    /// Whether at least one copy is on the shelf
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Case-insensitive match of an already lowercased needle against title or author
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.author.to_lowercase().contains(needle)
    }

    /// Take one copy off the shelf. Returns `false` when none is left.
    pub(crate) fn lend(&mut self) -> bool {
        match self.available_copies.checked_sub(1) {
            Some(remaining) => {
                self.available_copies = remaining;
                true
            }
            None => false,
        }
    }

    /// Put one copy back. Returns `false` when the shelf is already full.
    pub(crate) fn restock(&mut self) -> bool {
        if self.available_copies >= self.total_copies {
            return false;
        }
        self.available_copies = self.available_copies.saturating_add(1);
        true
    }

    /// Apply a patch, validating everything before any field is written
    ///
    /// # Errors
    ///
    /// Returns `InvalidGenre` for an unknown genre name,
    /// `AvailableExceedsTotal` when the available count is above the total, and
    /// `OutstandingLoans` when the counts no longer account for copies on loan.
    pub(crate) fn apply(&mut self, update: &BookUpdate) -> LibraryResult<()> {
        let genre = update.genre.as_deref().map(str::parse::<Genre>).transpose()?;

        let loans = self.loans();
        let total = update.total_copies.unwrap_or(self.total_copies);
        let available = match update.available_copies {
            Some(available) if available > total => {
                return Err(LibraryError::AvailableExceedsTotal { available, total });
            }
            Some(available) if total.saturating_sub(available) != loans => {
                return Err(LibraryError::OutstandingLoans { isbn: self.isbn.clone(), loans });
            }
            Some(available) => available,
            None => total
                .checked_sub(loans)
                .ok_or_else(|| LibraryError::OutstandingLoans { isbn: self.isbn.clone(), loans })?,
        };

        if let Some(title) = &update.title {
            self.title.clone_from(title);
        }
        if let Some(author) = &update.author {
            self.author.clone_from(author);
        }
        if let Some(genre) = genre {
            self.genre = genre;
        }
        self.total_copies = total;
        self.available_copies = available;
        Ok(())
    }
}

/// Partial update of a book's attributes
///
/// Absent fields are left untouched. The ISBN is not part of the patch, so
/// requests naming it are ignored along with any other unknown attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookUpdate {
    /// New title
    pub title: Option<String>,
    /// New author
    pub author: Option<String>,
    /// New genre, by display name
    pub genre: Option<String>,
    /// New number of owned copies
    pub total_copies: Option<u32>,
    /// New number of copies on the shelf
    pub available_copies: Option<u32>,
}

impl BookUpdate {
    /// An empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author
    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the genre by display name
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set the number of owned copies
    #[must_use]
    pub fn total_copies(mut self, total_copies: u32) -> Self {
        self.total_copies = Some(total_copies);
        self
    }

    /// Set the number of copies on the shelf
    #[must_use]
    pub fn available_copies(mut self, available_copies: u32) -> Self {
        self.available_copies = Some(available_copies);
        self
    }

    /// Build a patch from attribute name/value pairs.
    ///
    /// Unknown names and copy counts that are not unsigned integers are skipped.
    #[must_use]
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut update = Self::default();
        for (name, value) in fields {
            let value = value.as_ref();
            match name.as_ref() {
                "title" => update.title = Some(value.to_string()),
                "author" => update.author = Some(value.to_string()),
                "genre" => update.genre = Some(value.to_string()),
                "total_copies" => {
                    if let Ok(count) = value.parse() {
                        update.total_copies = Some(count);
                    }
                }
                "available_copies" => {
                    if let Ok(count) = value.parse() {
                        update.available_copies = Some(count);
                    }
                }
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

    /// Whether the patch names no attribute at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookUpdate};
    use crate::{error::LibraryError, genre::Genre};

    /// Four copies of Dune, none on loan
    fn dune() -> Book {
        Book::new("978-0-345-39180-3", "Dune", "Frank Herbert", Genre::SciFi, 4)
    }

    #[test]
    fn test_lend_and_restock_stay_in_bounds() {
        let mut book = Book::new("X", "T", "A", Genre::Fiction, 1);
        assert!(book.lend());
        assert!(!book.lend());
        assert_eq!(book.available_copies, 0);
        assert!(book.restock());
        assert!(!book.restock());
        assert_eq!(book.available_copies, 1);
    }

    #[test]
    fn test_total_only_update_keeps_loans() {
        let mut book = dune();
        assert!(book.lend());
        assert_eq!(book.apply(&BookUpdate::new().total_copies(6)), Ok(()));
        assert_eq!(book.available_copies, 5);
        assert_eq!(book.loans(), 1);
    }

    #[test]
    fn test_shrinking_below_loans_is_rejected() {
        let mut book = dune();
        assert!(book.lend());
        assert!(book.lend());
        let result = book.apply(&BookUpdate::new().total_copies(1));
        assert!(matches!(result, Err(LibraryError::OutstandingLoans { loans: 2, .. })));
        assert_eq!(book, {
            let mut expected = dune();
            expected.available_copies = 2;
            expected
        });
    }

    #[test]
    fn test_invalid_genre_leaves_book_untouched() {
        let mut book = dune();
        let result = book.apply(&BookUpdate::new().title("Dune Messiah").genre("Poetry"));
        assert_eq!(result, Err(LibraryError::InvalidGenre("Poetry".to_string())));
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_from_fields_skips_unknown_and_unparsable() {
        let update = BookUpdate::from_fields([
            ("isbn", "other"),
            ("publisher", "Chilton"),
            ("title", "Dune"),
            ("total_copies", "-3"),
            ("available_copies", "2"),
        ]);
        assert_eq!(update, BookUpdate::new().title("Dune").available_copies(2));
    }

    #[test]
    fn test_from_json_ignores_unknown_keys() {
        let update = BookUpdate::from_json(r#"{"isbn": "x", "author": "F. Herbert", "pages": 412}"#);
        assert_eq!(update, Ok(BookUpdate::new().author("F. Herbert")));
        assert!(BookUpdate::from_json("{}").is_ok_and(|update| update.is_empty()));
    }
}
