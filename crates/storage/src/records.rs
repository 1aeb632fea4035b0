use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use deckster_core::model::{CardId, Deck, DisplaySettings, SessionState};

use crate::store::StorageError;

//
// ─── SESSION STATE RECORD ──────────────────────────────────────────────────────
//

/// Persisted mirror of `SessionState`.
///
/// Field names keep the camelCase wire format of the original client so
/// existing saves stay readable. The transient flip is deliberately absent.
/// Missing fields default, so partially written records still load; a record
/// that fails to parse as a whole is the caller's cue to substitute a fresh
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateRecord {
    #[serde(default)]
    pub position: u64,
    #[serde(default)]
    pub missed: Vec<String>,
    #[serde(default)]
    pub review_mode: bool,
    #[serde(default)]
    pub review_position: u64,
    /// When this record was written; informational only.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SessionStateRecord {
    /// Snapshots in-memory state for persistence.
    #[must_use]
    pub fn from_state(state: &SessionState, saved_at: DateTime<Utc>) -> Self {
        Self {
            position: state.position() as u64,
            missed: state
                .missed()
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            review_mode: state.review_mode(),
            review_position: state.review_position() as u64,
            saved_at: Some(saved_at),
        }
    }

    /// Rehydrates domain state, repairing the record against the deck
    /// (pruning stale missed ids, wrapping positions, reconciling review
    /// mode).
    #[must_use]
    pub fn into_state(self, deck: &Deck) -> SessionState {
        SessionState::from_persisted(
            usize::try_from(self.position).unwrap_or(0),
            self.missed.into_iter().map(CardId::new).collect(),
            self.review_mode,
            usize::try_from(self.review_position).unwrap_or(0),
            deck,
        )
    }

    /// Parses a raw stored string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON. The caller
    /// decides whether to substitute defaults.
    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Serializes for storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

//
// ─── DISPLAY SETTINGS RECORD ───────────────────────────────────────────────────
//

/// Persisted mirror of `DisplaySettings`.
///
/// Decoding is deliberately generous: only a literal `false` turns a flag
/// off. Saves written before a preference existed (absent field, null, or a
/// stray type) keep the default-on behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettingsRecord {
    #[serde(default = "enabled", deserialize_with = "all_but_false")]
    pub show_front_example: bool,
    #[serde(default = "enabled", deserialize_with = "all_but_false")]
    pub show_back_example: bool,
}

impl Default for DisplaySettingsRecord {
    fn default() -> Self {
        Self {
            show_front_example: true,
            show_back_example: true,
        }
    }
}

impl DisplaySettingsRecord {
    #[must_use]
    pub fn from_settings(settings: &DisplaySettings) -> Self {
        Self {
            show_front_example: settings.show_front_example(),
            show_back_example: settings.show_back_example(),
        }
    }

    #[must_use]
    pub fn into_settings(self) -> DisplaySettings {
        DisplaySettings::new(self.show_front_example, self.show_back_example)
    }

    /// Parses a raw stored string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON.
    pub fn decode(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Serializes for storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` when encoding fails.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

fn enabled() -> bool {
    true
}

/// Literal `false` disables; every other value or type enables.
fn all_but_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Flag(bool),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Flag(flag) => flag,
        Lenient::Other(_) => true,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
