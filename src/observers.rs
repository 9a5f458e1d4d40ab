use tracing::info;

use crate::{events::CatalogEvent, library::Library};

/// Trait for catalog change observation
pub trait CatalogObserver: Send {
    /// Called after a mutation succeeded; `library` already reflects it
    fn on_event(&self, event: &CatalogEvent, library: &Library);
}

/// Logs every successful mutation
#[derive(Debug)]
pub struct AuditLogger;

impl CatalogObserver for AuditLogger {
    fn on_event(&self, event: &CatalogEvent, _library: &Library) {
        info!(?event, "catalog changed");
    }
}

/// Reports titles running out of copies and coming back
#[derive(Debug)]
pub struct AvailabilityNotifier;

impl CatalogObserver for AvailabilityNotifier {
    fn on_event(&self, event: &CatalogEvent, library: &Library) {
        match event {
            CatalogEvent::BookBorrowed { isbn, .. } => {
                if let Some(book) = library.book(isbn).filter(|book| !book.is_available()) {
                    info!(isbn = %book.isbn, title = %book.title, "no copies left");
                }
            }
            CatalogEvent::BookReturned { isbn, .. } => {
                if let Some(book) = library.book(isbn).filter(|book| book.available_copies == 1) {
                    info!(isbn = %book.isbn, title = %book.title, "available again");
                }
            }
            _ => {}
        }
    }
}
