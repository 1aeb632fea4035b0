use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Card within its deck.
///
/// Ids are strings: the deck source's own id, its external note id, or the
/// positional fallback the normalizer generates. The normalizer guarantees
/// they are non-empty and unique.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Creates a new `CardId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardId({})", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_display() {
        let id = CardId::new("note-42");
        assert_eq!(id.to_string(), "note-42");
    }

    #[test]
    fn test_card_id_equality() {
        assert_eq!(CardId::new("a"), CardId::new("a"));
        assert_ne!(CardId::new("a"), CardId::new("b"));
    }

    #[test]
    fn test_card_id_as_str() {
        let id = CardId::new(String::from("1700"));
        assert_eq!(id.as_str(), "1700");
    }
}
