use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

/// Genres a book can be filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Genre {
    /// Novels and other invented stories
    Fiction,
    /// Factual works
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    /// Science fiction
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

impl Genre {
    /// Every accepted genre, in display order
    pub const ALL: [Self; 3] = [Self::Fiction, Self::NonFiction, Self::SciFi];

    /// The name a genre is written as in requests and output
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
            Self::SciFi => "Sci-Fi",
        }
    }

    /// Comma separated list of accepted names, used in error messages
    #[must_use]
    pub fn accepted_names() -> String {
        Self::ALL.iter().map(|genre| genre.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for Genre {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| LibraryError::InvalidGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Genre;
    use crate::error::LibraryError;

    #[test]
    fn test_parses_display_names() {
        assert_eq!("Fiction".parse::<Genre>().ok(), Some(Genre::Fiction));
        assert_eq!("Non-Fiction".parse::<Genre>().ok(), Some(Genre::NonFiction));
        assert_eq!("Sci-Fi".parse::<Genre>().ok(), Some(Genre::SciFi));
    }

    #[test]
    fn test_rejects_unknown_and_miscased_names() {
        assert!("Romance".parse::<Genre>().is_err());
        assert!("fiction".parse::<Genre>().is_err());
        assert!("NonFiction".parse::<Genre>().is_err());
    }

    #[test]
    fn test_serializes_as_display_name() {
        let json = serde_json::to_string(&Genre::SciFi).ok();
        assert_eq!(json.as_deref(), Some("\"Sci-Fi\""));
    }

    #[test]
    fn test_error_lists_accepted_names() {
        let message = LibraryError::InvalidGenre("Poetry".to_string()).to_string();
        assert!(message.ends_with(&Genre::accepted_names()));
    }
}
