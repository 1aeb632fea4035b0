use std::collections::HashMap;

use crate::model::{Card, CardId};

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// An immutable, ordered collection of study cards plus metadata.
///
/// Card order is the insertion order of the source. Lookup by id goes through
/// an index built once at construction, so it stays O(1) however the deck is
/// traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    id: String,
    title: String,
    cards: Vec<Card>,
    index: HashMap<CardId, usize>,
}

impl Deck {
    /// Creates a deck from already-normalized cards.
    ///
    /// Card ids must be unique within the deck; `normalize` guarantees this
    /// for decks built from external input.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, cards: Vec<Card>) -> Self {
        let index = cards
            .iter()
            .enumerate()
            .map(|(position, card)| (card.id.clone(), position))
            .collect();

        Self {
            id: id.into(),
            title: title.into(),
            cards,
            index,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Looks up a card by id.
    #[must_use]
    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.index.get(id).map(|&position| &self.cards[position])
    }

    /// Returns the card at the given sequence position.
    #[must_use]
    pub fn card_at(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    /// Returns true when the deck contains a card with the given id.
    #[must_use]
    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str) -> Card {
        Card {
            id: CardId::new(id),
            front: format!("{id}-front"),
            front_example: String::new(),
            back: format!("{id}-back"),
            back_example: String::new(),
            audio_url: None,
        }
    }

    #[test]
    fn deck_preserves_insertion_order() {
        let deck = Deck::new("d", "Deck", vec![card("b"), card("a"), card("c")]);
        let order: Vec<&str> = deck.cards().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    #[test]
    fn deck_looks_up_cards_by_id() {
        let deck = Deck::new("d", "Deck", vec![card("a"), card("b")]);
        assert_eq!(deck.get(&CardId::new("b")).unwrap().front, "b-front");
        assert!(deck.get(&CardId::new("missing")).is_none());
        assert!(deck.contains(&CardId::new("a")));
    }

    #[test]
    fn deck_indexes_positions() {
        let deck = Deck::new("d", "Deck", vec![card("a"), card("b")]);
        assert_eq!(deck.card_at(1).unwrap().id, CardId::new("b"));
        assert!(deck.card_at(2).is_none());
        assert_eq!(deck.len(), 2);
        assert!(!deck.is_empty());
    }
}
