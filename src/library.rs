use std::{
    collections::{HashMap, VecDeque},
    fmt,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    book::{Book, BookUpdate},
    config::LibraryConfig,
    error::{LibraryError, LibraryResult, Success},
    events::CatalogEvent,
    genre::Genre,
    member::{Member, MemberUpdate},
    observers::{AuditLogger, AvailabilityNotifier, CatalogObserver},
    timestamp::TimeStamp,
};

/// A successful mutation and when it happened
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryEntry {
    /// What changed
    pub event: CatalogEvent,
    /// When it changed
    pub timestamp: TimeStamp,
}

/// The catalog: every book, every member, and who holds what
pub struct Library {
    /// Books keyed by ISBN
    books: HashMap<String, Book>,
    /// ISBNs in catalog insertion order
    book_order: Vec<String>,
    /// Members keyed by member ID
    members: HashMap<String, Member>,
    /// Member IDs in registration order
    member_order: Vec<String>,
    /// Record of successful mutations, oldest first
    history: VecDeque<HistoryEntry>,
    /// Borrowing limit and history capacity
    config: LibraryConfig,
    /// Registered change observers
    observers: Vec<Box<dyn CatalogObserver>>,
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("books", &self.books)
            .field("book_order", &self.book_order)
            .field("members", &self.members)
            .field("member_order", &self.member_order)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// An empty library with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LibraryConfig::default())
    }

    /// An empty library with an explicit configuration. A borrowing limit
    /// above [`crate::config::MAX_BORROW_LIMIT`] is lowered to it.
    #[must_use]
    pub fn with_config(config: LibraryConfig) -> Self {
        let config = config.clamped();
        Self {
            books: HashMap::new(),
            book_order: Vec::new(),
            members: HashMap::new(),
            member_order: Vec::new(),
            history: VecDeque::new(),
            config,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of every successful mutation
    pub fn register_observer(&mut self, observer: Box<dyn CatalogObserver>) {
        self.observers.push(observer);
    }

    /// Register the audit logger and the availability notifier
    pub fn register_default_observers(&mut self) {
        self.register_observer(Box::new(AuditLogger));
        self.register_observer(Box::new(AvailabilityNotifier));
    }

    // ---------- Books ----------

    /// Catalogue a title with all `total_copies` on the shelf
    ///
    /// # Errors
    ///
    /// `DuplicateIsbn` if the ISBN is taken, `InvalidGenre` if `genre` is not
    /// one of the accepted names. Nothing is stored on failure.
    pub fn add_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        genre: &str,
        total_copies: u32,
    ) -> LibraryResult {
        let outcome = self.insert_book(isbn, title, author, genre, total_copies);
        self.finish(outcome, Success::BookAdded)
    }

    /// Store a new book
    fn insert_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        genre: &str,
        total_copies: u32,
    ) -> LibraryResult<CatalogEvent> {
        if self.books.contains_key(isbn) {
            return Err(LibraryError::DuplicateIsbn { isbn: isbn.to_string() });
        }
        let genre: Genre = genre.parse()?;

        self.books.insert(isbn.to_string(), Book::new(isbn, title, author, genre, total_copies));
        self.book_order.push(isbn.to_string());
        Ok(CatalogEvent::BookAdded { isbn: isbn.to_string() })
    }

    /// Books whose title or author contains `query`, ignoring case, in catalog order
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<Book> {
        let needle = query.to_lowercase();
        self.books().filter(|book| book.matches(&needle)).cloned().collect()
    }

    /// Overwrite the attributes named in `update`
    ///
    /// # Errors
    ///
    /// `BookNotFound` for an unknown ISBN, `InvalidGenre` for an unknown
    /// genre, `AvailableExceedsTotal` or `OutstandingLoans` when the copy
    /// counts would not add up. The book is unchanged on failure.
    pub fn update_book(&mut self, isbn: &str, update: &BookUpdate) -> LibraryResult {
        let outcome = self.patch_book(isbn, update);
        self.finish(outcome, Success::BookUpdated)
    }

    /// Apply a patch to a stored book
    fn patch_book(&mut self, isbn: &str, update: &BookUpdate) -> LibraryResult<CatalogEvent> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;
        book.apply(update)?;
        Ok(CatalogEvent::BookUpdated { isbn: isbn.to_string() })
    }

    /// Remove a title with no copies on loan
    ///
    /// # Errors
    ///
    /// `BookNotFound` for an unknown ISBN, `BookOnLoan` while any copy is out.
    pub fn delete_book(&mut self, isbn: &str) -> LibraryResult {
        let outcome = self.remove_book(isbn);
        self.finish(outcome, Success::BookDeleted)
    }

    /// Drop a book from the map and the order list
    fn remove_book(&mut self, isbn: &str) -> LibraryResult<CatalogEvent> {
        let book =
            self.books.get(isbn).ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;
        let loans = book.loans();
        if loans > 0 {
            return Err(LibraryError::BookOnLoan { isbn: isbn.to_string(), loans });
        }

        self.books.remove(isbn);
        self.book_order.retain(|key| key != isbn);
        Ok(CatalogEvent::BookDeleted { isbn: isbn.to_string() })
    }

    // ---------- Members ----------

    /// Register a member with nothing on loan
    ///
    /// # Errors
    ///
    /// `DuplicateMember` if the ID is taken.
    pub fn add_member(&mut self, member_id: &str, name: &str, email: &str) -> LibraryResult {
        let outcome = self.insert_member(member_id, name, email);
        self.finish(outcome, Success::MemberAdded)
    }

    /// Store a new member
    fn insert_member(
        &mut self,
        member_id: &str,
        name: &str,
        email: &str,
    ) -> LibraryResult<CatalogEvent> {
        if self.members.contains_key(member_id) {
            return Err(LibraryError::DuplicateMember { member_id: member_id.to_string() });
        }

        self.members.insert(member_id.to_string(), Member::new(member_id, name, email));
        self.member_order.push(member_id.to_string());
        Ok(CatalogEvent::MemberAdded { member_id: member_id.to_string() })
    }

    /// Overwrite the contact details named in `update`
    ///
    /// # Errors
    ///
    /// `MemberNotFound` for an unknown ID.
    pub fn update_member(&mut self, member_id: &str, update: &MemberUpdate) -> LibraryResult {
        let outcome = self.patch_member(member_id, update);
        self.finish(outcome, Success::MemberUpdated)
    }

    /// Apply a patch to a stored member
    fn patch_member(
        &mut self,
        member_id: &str,
        update: &MemberUpdate,
    ) -> LibraryResult<CatalogEvent> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound { member_id: member_id.to_string() })?;
        member.apply(update);
        Ok(CatalogEvent::MemberUpdated { member_id: member_id.to_string() })
    }

    /// Remove a member holding no books
    ///
    /// # Errors
    ///
    /// `MemberNotFound` for an unknown ID, `MemberHasLoans` while the member
    /// still holds a book.
    pub fn delete_member(&mut self, member_id: &str) -> LibraryResult {
        let outcome = self.remove_member(member_id);
        self.finish(outcome, Success::MemberDeleted)
    }

    /// Drop a member from the map and the order list
    fn remove_member(&mut self, member_id: &str) -> LibraryResult<CatalogEvent> {
        let member = self
            .members
            .get(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound { member_id: member_id.to_string() })?;
        if !member.borrowed_books.is_empty() {
            return Err(LibraryError::MemberHasLoans {
                member_id: member_id.to_string(),
                loans: member.borrowed_books.len(),
            });
        }

        self.members.remove(member_id);
        self.member_order.retain(|key| key != member_id);
        Ok(CatalogEvent::MemberDeleted { member_id: member_id.to_string() })
    }

    // ---------- Borrow / Return ----------

    /// Lend one copy of `isbn` to `member_id`
    ///
    /// # Errors
    ///
    /// Checked in this order: `MemberNotFound`, `BookNotFound`,
    /// `BorrowLimitReached`, `NoCopiesAvailable`, `AlreadyBorrowed`.
    pub fn borrow_book(&mut self, member_id: &str, isbn: &str) -> LibraryResult {
        let outcome = self.lend(member_id, isbn);
        self.finish(outcome, Success::BookBorrowed)
    }

    /// Move a copy from the shelf to the member
    fn lend(&mut self, member_id: &str, isbn: &str) -> LibraryResult<CatalogEvent> {
        let limit = self.config.borrow_limit;
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound { member_id: member_id.to_string() })?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;

        if !member.can_borrow(limit) {
            return Err(LibraryError::BorrowLimitReached { member_id: member_id.to_string(), limit });
        }
        if !book.is_available() {
            return Err(LibraryError::NoCopiesAvailable { isbn: isbn.to_string() });
        }
        if member.has_borrowed(isbn) {
            return Err(LibraryError::AlreadyBorrowed {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            });
        }
        if !book.lend() {
            return Err(LibraryError::NoCopiesAvailable { isbn: isbn.to_string() });
        }
        member.borrow(isbn);

        Ok(CatalogEvent::BookBorrowed { member_id: member_id.to_string(), isbn: isbn.to_string() })
    }

    /// Take back the copy of `isbn` held by `member_id`
    ///
    /// # Errors
    ///
    /// `MemberNotFound`, `BookNotFound`, or `NotBorrowed` when the member does
    /// not hold the book.
    pub fn return_book(&mut self, member_id: &str, isbn: &str) -> LibraryResult {
        let outcome = self.take_back(member_id, isbn);
        self.finish(outcome, Success::BookReturned)
    }

    /// Move a copy from the member back to the shelf
    fn take_back(&mut self, member_id: &str, isbn: &str) -> LibraryResult<CatalogEvent> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::MemberNotFound { member_id: member_id.to_string() })?;
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;

        if !member.has_borrowed(isbn) || !book.restock() {
            return Err(LibraryError::NotBorrowed {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            });
        }
        member.give_back(isbn);

        Ok(CatalogEvent::BookReturned { member_id: member_id.to_string(), isbn: isbn.to_string() })
    }

    // ---------- Queries ----------

    /// The book catalogued under `isbn`
    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// The member registered under `member_id`
    #[must_use]
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// All books in catalog insertion order
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.book_order.iter().filter_map(|isbn| self.books.get(isbn))
    }

    /// All members in registration order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.member_order.iter().filter_map(|member_id| self.members.get(member_id))
    }

    /// Number of catalogued titles
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of registered members
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// ISBNs on loan to `member_id`, oldest first
    #[must_use]
    pub fn borrowed_books(&self, member_id: &str) -> Option<&[String]> {
        self.members.get(member_id).map(|member| member.borrowed_books.as_slice())
    }

    /// Recent successful mutations, oldest first
    #[must_use]
    pub fn history(&self) -> &VecDeque<HistoryEntry> {
        &self.history
    }

    /// The configuration this library was built with
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    // ---------- Bookkeeping ----------

    /// Record a successful mutation, or log why it was refused
    fn finish(&mut self, outcome: LibraryResult<CatalogEvent>, success: Success) -> LibraryResult {
        match outcome {
            Ok(event) => {
                self.record(event);
                Ok(success)
            }
            Err(err) => {
                debug!(operation = ?success, kind = ?err.kind(), reason = %err, "operation rejected");
                Err(err)
            }
        }
    }

    /// Notify observers and append to the bounded history
    fn record(&mut self, event: CatalogEvent) {
        for observer in &self.observers {
            observer.on_event(&event, self);
        }

        self.history.push_back(HistoryEntry { event, timestamp: TimeStamp::now() });
        while self.history.len() > self.config.max_history_size {
            self.history.pop_front();
        }
    }
}
