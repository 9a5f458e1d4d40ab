use serde::{Deserialize, Serialize};

use crate::{
    book::Book,
    error::{LibraryError, LibraryResult},
    library::{HistoryEntry, Library},
    member::Member,
};

/// Owned copy of the whole catalog, in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSnapshot {
    /// Every book
    pub books: Vec<Book>,
    /// Every member
    pub members: Vec<Member>,
}

impl From<&Library> for CatalogSnapshot {
    fn from(library: &Library) -> Self {
        Self {
            books: library.books().cloned().collect(),
            members: library.members().cloned().collect(),
        }
    }
}

/// Rendering of the catalog for people
#[derive(Debug)]
pub struct CatalogReport;

impl CatalogReport {
    /// One line per book and per member
    #[must_use]
    pub fn render_text(library: &Library) -> String {
        let mut out = format!("=== Books ({}) ===\n", library.book_count());
        for book in library.books() {
            out.push_str(&Self::book_line(book));
            out.push('\n');
        }

        out.push_str(&format!("=== Members ({}) ===\n", library.member_count()));
        for member in library.members() {
            let borrowed = if member.borrowed_books.is_empty() {
                "nothing borrowed".to_string()
            } else {
                member.borrowed_books.join(", ")
            };
            out.push_str(&format!(
                "{} {} <{}>: {borrowed}\n",
                member.member_id, member.name, member.email
            ));
        }
        out
    }

    /// A single catalog line for a book
    #[must_use]
    pub fn book_line(book: &Book) -> String {
        format!(
            "{} by {} (ISBN: {}) [{}] {}/{} available",
            book.title, book.author, book.isbn, book.genre, book.available_copies, book.total_copies
        )
    }

    /// Markdown table of the recorded history
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn history_table(history: &[HistoryEntry]) -> String {
        if history.is_empty() {
            return "No changes recorded yet.".to_string();
        }

        let mut table = String::from("| # | Time | Event |\n");
        table.push_str("|---|------|-------|\n");

        for (i, entry) in history.iter().enumerate() {
            table.push_str(&format!(
                "| {} | {}.{:09} | {:?} |\n",
                i + 1,
                entry.timestamp.seconds,
                entry.timestamp.nanos,
                entry.event
            ));
        }

        table
    }

    /// Pretty JSON of every book and member
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::Serialization` if the catalog cannot be encoded.
    pub fn to_json(library: &Library) -> LibraryResult<String> {
        Self::json(&CatalogSnapshot::from(library))
    }

    /// Pretty JSON of any serializable catalog value, such as search results
    ///
    /// # Errors
    ///
    /// Returns a `LibraryError::Serialization` if the value cannot be encoded.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> LibraryResult<String> {
        serde_json::to_string_pretty(value).map_err(|e| LibraryError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogReport, CatalogSnapshot};
    use crate::library::Library;

    /// Two books, one member holding one copy of Dune
    fn sample() -> Library {
        let mut library = Library::new();
        drop(library.add_book("978-0-345-39180-3", "Dune", "Frank Herbert", "Sci-Fi", 4));
        drop(library.add_book("978-0-553-29335-0", "1984", "George Orwell", "Fiction", 3));
        drop(library.add_member("M002", "Bob Smith", "bob@email.com"));
        drop(library.borrow_book("M002", "978-0-345-39180-3"));
        library
    }

    #[test]
    fn test_text_lists_books_then_members() {
        let text = CatalogReport::render_text(&sample());
        let expected = "=== Books (2) ===\n\
            Dune by Frank Herbert (ISBN: 978-0-345-39180-3) [Sci-Fi] 3/4 available\n\
            1984 by George Orwell (ISBN: 978-0-553-29335-0) [Fiction] 3/3 available\n\
            === Members (1) ===\n\
            M002 Bob Smith <bob@email.com>: 978-0-345-39180-3\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_json_snapshot_decodes_back() {
        let library = sample();
        let json = CatalogReport::to_json(&library);
        let decoded = json
            .ok()
            .and_then(|json| serde_json::from_str::<CatalogSnapshot>(&json).ok());
        assert_eq!(decoded, Some(CatalogSnapshot::from(&library)));
    }

    #[test]
    fn test_history_table_numbers_rows() {
        let library = sample();
        let history: Vec<_> = library.history().iter().cloned().collect();
        let table = CatalogReport::history_table(&history);
        assert_eq!(table.lines().count(), 6);
        assert!(table.contains("| 4 |"));
        assert!(table.contains("BookBorrowed"));
        assert_eq!(CatalogReport::history_table(&[]), "No changes recorded yet.");
    }
}
