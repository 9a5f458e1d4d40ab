use serde::{Deserialize, Serialize};

/// Most books a member may ever hold at once
pub const MAX_BORROW_LIMIT: usize = 3;

/// Default number of books a member may hold at once
pub const DEFAULT_BORROW_LIMIT: usize = MAX_BORROW_LIMIT;

/// Default number of history entries kept
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 100;

/// Tunables for a [`crate::Library`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Maximum concurrent loans per member
    pub borrow_limit: usize,
    /// Maximum number of history entries kept, oldest dropped first
    pub max_history_size: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self { borrow_limit: DEFAULT_BORROW_LIMIT, max_history_size: DEFAULT_MAX_HISTORY_SIZE }
    }
}

impl LibraryConfig {
    /// Set the borrowing limit, capped at [`MAX_BORROW_LIMIT`]
    #[must_use]
    pub fn with_borrow_limit(mut self, borrow_limit: usize) -> Self {
        self.borrow_limit = borrow_limit.min(MAX_BORROW_LIMIT);
        self
    }

    /// The same configuration with the borrowing limit brought within bounds
    #[must_use]
    pub fn clamped(self) -> Self {
        self.with_borrow_limit(self.borrow_limit)
    }

    /// Set the history capacity
    #[must_use]
    pub fn with_max_history_size(mut self, max_history_size: usize) -> Self {
        self.max_history_size = max_history_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_HISTORY_SIZE, LibraryConfig, MAX_BORROW_LIMIT};

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let config = serde_json::from_str::<LibraryConfig>(r#"{"borrow_limit": 5}"#).ok();
        assert_eq!(
            config,
            Some(LibraryConfig { borrow_limit: 5, max_history_size: DEFAULT_MAX_HISTORY_SIZE })
        );
        assert_eq!(LibraryConfig::default().borrow_limit, 3);
    }

    #[test]
    fn test_borrow_limit_can_only_be_lowered() {
        assert_eq!(LibraryConfig::default().with_borrow_limit(10).borrow_limit, MAX_BORROW_LIMIT);
        assert_eq!(LibraryConfig::default().with_borrow_limit(1).borrow_limit, 1);

        let loaded = serde_json::from_str::<LibraryConfig>(r#"{"borrow_limit": 7}"#).ok();
        assert_eq!(loaded.map(|config| config.clamped().borrow_limit), Some(MAX_BORROW_LIMIT));
    }
}
