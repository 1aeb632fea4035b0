use crate::model::{Card, CardId, Deck};

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Mutable traversal state for one study session.
///
/// Two sequences can be active: the full deck (linear mode) or the missed
/// queue (review mode). Positions are always read modulo the active sequence
/// length, so a deck that shrank since the state was saved wraps instead of
/// indexing out of bounds.
///
/// Every mutator is total: invoked in a configuration where the operation
/// does not apply (empty deck, empty review queue, no current card) it
/// changes nothing and returns `false`, letting callers skip persistence for
/// no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    position: usize,
    missed: Vec<CardId>,
    review_mode: bool,
    review_position: usize,
    flipped: bool,
}

impl SessionState {
    /// Creates a fresh session at the top of the deck.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrates persisted state against the current deck.
    ///
    /// Persisted state is repaired rather than trusted: ids no longer in the
    /// deck are pruned from the missed queue (along with duplicates a corrupt
    /// store may contain), both positions wrap into range, review mode is
    /// forced off when the queue comes back empty, and the flip is cleared.
    #[must_use]
    pub fn from_persisted(
        position: usize,
        missed: Vec<CardId>,
        review_mode: bool,
        review_position: usize,
        deck: &Deck,
    ) -> Self {
        let mut queue: Vec<CardId> = Vec::with_capacity(missed.len());
        for id in missed {
            if deck.contains(&id) && !queue.contains(&id) {
                queue.push(id);
            }
        }

        let mut state = Self {
            position: if deck.is_empty() {
                0
            } else {
                position % deck.len()
            },
            review_position: if queue.is_empty() {
                0
            } else {
                review_position % queue.len()
            },
            missed: queue,
            review_mode,
            flipped: false,
        };
        state.reconcile_review();
        state
    }

    // Accessors
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Ids most recently marked unknown, in first-miss order.
    #[must_use]
    pub fn missed(&self) -> &[CardId] {
        &self.missed
    }

    #[must_use]
    pub fn review_mode(&self) -> bool {
        self.review_mode
    }

    #[must_use]
    pub fn review_position(&self) -> usize {
        self.review_position
    }

    /// Whether the current card's back face is showing. Transient; never
    /// persisted.
    #[must_use]
    pub fn flipped(&self) -> bool {
        self.flipped
    }

    /// Derives the card currently facing the user.
    ///
    /// Empty deck means no card. In review mode with a non-empty queue the
    /// queue entry at `review_position` (mod queue length) is looked up in
    /// the deck; a lookup miss yields no card for this tick rather than an
    /// error. Otherwise the deck card at `position` (mod deck length).
    #[must_use]
    pub fn current_card<'a>(&self, deck: &'a Deck) -> Option<&'a Card> {
        if deck.is_empty() {
            return None;
        }
        if self.review_mode && !self.missed.is_empty() {
            let id = &self.missed[self.review_position % self.missed.len()];
            return deck.get(id);
        }
        deck.card_at(self.position % deck.len())
    }

    /// Steps forward one card in the active sequence, wrapping past the end.
    ///
    /// Clears the flip. No-op on an empty deck, or in review mode with an
    /// empty queue.
    pub fn advance(&mut self, deck: &Deck) -> bool {
        if deck.is_empty() {
            return false;
        }
        if self.review_mode {
            if self.missed.is_empty() {
                return false;
            }
            self.review_position = (self.review_position + 1) % self.missed.len();
        } else {
            self.position = (self.position + 1) % deck.len();
        }
        self.flipped = false;
        true
    }

    /// Toggles the back face. No-op when there is no current card.
    pub fn flip(&mut self, deck: &Deck) -> bool {
        if self.current_card(deck).is_none() {
            return false;
        }
        self.flipped = !self.flipped;
        true
    }

    /// Records a recall outcome for the current card, then advances.
    ///
    /// `known` removes the card's id from the missed queue if present;
    /// unknown appends it only when absent, so a repeat miss keeps its
    /// original queue position. Emptying the queue while reviewing forces
    /// review mode off before the advance. No-op when there is no current
    /// card.
    pub fn answer(&mut self, known: bool, deck: &Deck) -> bool {
        let Some(card) = self.current_card(deck) else {
            return false;
        };
        let id = card.id.clone();

        if known {
            self.missed.retain(|missed| *missed != id);
        } else if !self.missed.contains(&id) {
            self.missed.push(id);
        }

        self.reconcile_review();
        self.advance(deck);
        true
    }

    /// Enters review mode at the head of the missed queue.
    ///
    /// Clears the flip. No-op when the missed queue is empty.
    pub fn start_review(&mut self) -> bool {
        if self.missed.is_empty() {
            return false;
        }
        self.review_mode = true;
        self.review_position = 0;
        self.flipped = false;
        true
    }

    /// Leaves review mode, keeping the missed queue and review position.
    ///
    /// No-op when review mode is already off.
    pub fn exit_review(&mut self) -> bool {
        if !self.review_mode {
            return false;
        }
        self.review_mode = false;
        true
    }

    /// Returns every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Derives the source values for a progress label over the active
    /// sequence.
    #[must_use]
    pub fn progress(&self, deck: &Deck) -> Progress {
        if self.review_mode && !self.missed.is_empty() {
            return Progress {
                current: self.review_position % self.missed.len() + 1,
                total: self.missed.len(),
                reviewing: true,
            };
        }
        if deck.is_empty() {
            return Progress {
                current: 0,
                total: 0,
                reviewing: false,
            };
        }
        Progress {
            current: self.position % deck.len() + 1,
            total: deck.len(),
            reviewing: false,
        }
    }

    // Invariant: review mode requires a non-empty missed queue.
    fn reconcile_review(&mut self) {
        if self.review_mode && self.missed.is_empty() {
            self.review_mode = false;
            self.review_position = 0;
        }
    }
}

/// Position within the active sequence, for a "3 / 50" style label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based index of the current card; 0 when nothing is showing.
    pub current: usize,
    pub total: usize,
    /// True while the missed queue is the active sequence.
    pub reviewing: bool,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
