use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use deckster_core::Clock;
use deckster_core::model::{Card, Deck, DisplayField, DisplaySettings, Progress, SessionState};
use storage::records::{DisplaySettingsRecord, SessionStateRecord};
use storage::store::KeyValueStore;

use crate::player::AudioPlayer;

/// Storage key for the persisted session state record.
pub const SESSION_STATE_KEY: &str = "deckster-session";

/// Storage key for the persisted display settings record.
pub const DISPLAY_SETTINGS_KEY: &str = "deckster-display";

//
// ─── LOAD POLICY ───────────────────────────────────────────────────────────────
//

/// Loads persisted session state, substituting a fresh default on absence,
/// read failure, or parse failure.
///
/// The fallback policy lives here as an explicit, testable function rather
/// than in a catch-all handler: malformed persisted data must never take the
/// session down. Also returns the record's save timestamp, when one was
/// readable.
#[must_use]
pub fn load_state(
    store: &dyn KeyValueStore,
    deck: &Deck,
) -> (SessionState, Option<DateTime<Utc>>) {
    match store.get(SESSION_STATE_KEY) {
        Ok(Some(raw)) => match SessionStateRecord::decode(&raw) {
            Ok(record) => {
                let saved_at = record.saved_at;
                (record.into_state(deck), saved_at)
            }
            Err(err) => {
                warn!("discarding unreadable session state: {err}");
                (SessionState::new(), None)
            }
        },
        Ok(None) => (SessionState::new(), None),
        Err(err) => {
            warn!("session state unavailable, starting fresh: {err}");
            (SessionState::new(), None)
        }
    }
}

/// Loads persisted display settings, substituting defaults on absence or
/// failure.
#[must_use]
pub fn load_display(store: &dyn KeyValueStore) -> DisplaySettings {
    match store.get(DISPLAY_SETTINGS_KEY) {
        Ok(Some(raw)) => match DisplaySettingsRecord::decode(&raw) {
            Ok(record) => record.into_settings(),
            Err(err) => {
                warn!("discarding unreadable display settings: {err}");
                DisplaySettings::default()
            }
        },
        Ok(None) => DisplaySettings::default(),
        Err(err) => {
            warn!("display settings unavailable, using defaults: {err}");
            DisplaySettings::default()
        }
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Owns all mutable study-session state and the persistence policy.
///
/// Construction loads persisted state and repairs it against the deck. Every
/// user action runs its pure transition on `SessionState`, then — when the
/// transition changed persistent state — writes the session record back
/// through the storage port. A failed write is logged and swallowed: the
/// in-memory session stays authoritative for the rest of the run, only
/// durability is at risk. The controller never returns an error.
pub struct SessionController {
    deck: Deck,
    state: SessionState,
    display: DisplaySettings,
    last_studied: Option<DateTime<Utc>>,
    store: Arc<dyn KeyValueStore>,
    player: Arc<dyn AudioPlayer>,
    clock: Clock,
}

impl SessionController {
    /// Creates a controller over the given deck, loading persisted progress.
    #[must_use]
    pub fn new(deck: Deck, store: Arc<dyn KeyValueStore>, player: Arc<dyn AudioPlayer>) -> Self {
        Self::with_clock(deck, store, player, Clock::default_clock())
    }

    /// Same as `new` with an explicit clock, for deterministic save stamps.
    #[must_use]
    pub fn with_clock(
        deck: Deck,
        store: Arc<dyn KeyValueStore>,
        player: Arc<dyn AudioPlayer>,
        clock: Clock,
    ) -> Self {
        let (state, last_studied) = load_state(store.as_ref(), &deck);
        let display = load_display(store.as_ref());

        info!(
            deck = deck.title(),
            cards = deck.len(),
            missed = state.missed().len(),
            review = state.review_mode(),
            "session ready"
        );

        Self {
            deck,
            state,
            display,
            last_studied,
            store,
            player,
            clock,
        }
    }

    // Accessors
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    /// When the deck was last studied before this session, per the loaded
    /// record.
    #[must_use]
    pub fn last_studied(&self) -> Option<DateTime<Utc>> {
        self.last_studied
    }

    /// The card currently facing the user, if any.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.state.current_card(&self.deck)
    }

    /// Progress over the active sequence, for the session label.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.state.progress(&self.deck)
    }

    /// Moves to the next card in the active sequence.
    pub fn advance(&mut self) {
        if self.state.advance(&self.deck) {
            self.persist_state();
        }
    }

    /// Toggles the current card's back face.
    ///
    /// The flip is transient, so nothing is ever persisted for it.
    pub fn flip(&mut self) {
        self.state.flip(&self.deck);
    }

    /// Marks the current card known or unknown, then advances.
    ///
    /// One user action, one write: the missed-queue update and the advance
    /// persist together.
    pub fn answer(&mut self, known: bool) {
        if self.state.answer(known, &self.deck) {
            self.persist_state();
        }
    }

    /// Requests playback of the current card's pronunciation.
    ///
    /// Silent no-op without a current card or audio reference; playback
    /// failures are logged and swallowed. No state changes.
    pub fn play_sound(&self) {
        let Some(card) = self.current_card() else {
            return;
        };
        let Some(reference) = card.audio_url.as_deref() else {
            return;
        };

        debug!(%reference, "requesting audio playback");
        if let Err(err) = self.player.play(reference) {
            warn!("audio playback failed: {err}");
        }
    }

    /// Enters review mode over the missed queue; no-op when it is empty.
    pub fn start_review(&mut self) {
        if self.state.start_review() {
            self.persist_state();
        }
    }

    /// Leaves review mode, keeping the missed queue for a later pass.
    pub fn exit_review(&mut self) {
        if self.state.exit_review() {
            self.persist_state();
        }
    }

    /// Discards all progress and erases the persisted session entry.
    ///
    /// Destructive and irreversible — callers must confirm with the user
    /// before invoking. The storage key is removed outright, not overwritten
    /// with defaults. Display settings are left alone.
    pub fn reset_progress(&mut self) {
        self.state.reset();
        self.last_studied = None;
        if let Err(err) = self.store.remove(SESSION_STATE_KEY) {
            warn!("failed to erase persisted session state: {err}");
        }
    }

    /// Updates one display preference and persists it immediately.
    pub fn set_display(&mut self, field: DisplayField, value: bool) {
        if self.display.set(field, value) {
            self.persist_display();
        }
    }

    fn persist_state(&self) {
        let record = SessionStateRecord::from_state(&self.state, self.clock.now());
        match record.encode() {
            Ok(raw) => {
                if let Err(err) = self.store.set(SESSION_STATE_KEY, &raw) {
                    warn!("failed to persist session state: {err}");
                }
            }
            Err(err) => warn!("failed to encode session state: {err}"),
        }
    }

    fn persist_display(&self) {
        let record = DisplaySettingsRecord::from_settings(&self.display);
        match record.encode() {
            Ok(raw) => {
                if let Err(err) = self.store.set(DISPLAY_SETTINGS_KEY, &raw) {
                    warn!("failed to persist display settings: {err}");
                }
            }
            Err(err) => warn!("failed to encode display settings: {err}"),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
