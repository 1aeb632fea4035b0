use serde::Deserialize;
use std::collections::HashSet;

use crate::model::{Card, CardId, Deck};

/// Deck id used when the source supplies none.
pub const DEFAULT_DECK_ID: &str = "default-deck";

/// Deck title used when the source supplies none.
pub const DEFAULT_DECK_TITLE: &str = "Deckster Lab";

//
// ─── SOURCE SHAPES ─────────────────────────────────────────────────────────────
//

/// Loosely-typed deck payload as read from external input.
///
/// Every field is optional, and text fields tolerate JSON numbers or
/// booleans in place of strings. `normalize` turns any such payload into a
/// strict `Deck`; there is no error path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckSource {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub cards: Vec<CardSource>,
}

/// One card record of the deck payload.
///
/// The `de_*`/`en_*` aliases accept decks emitted by the converter the
/// original German word list shipped with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardSource {
    #[serde(default, deserialize_with = "loose_text")]
    pub id: Option<String>,
    /// External note identifier from the source collection.
    #[serde(default, deserialize_with = "loose_text")]
    pub note_id: Option<String>,
    #[serde(default, alias = "de_word", deserialize_with = "loose_text")]
    pub front: Option<String>,
    #[serde(default, alias = "de_sentence", deserialize_with = "loose_text")]
    pub front_example: Option<String>,
    #[serde(default, alias = "en_word", deserialize_with = "loose_text")]
    pub back: Option<String>,
    #[serde(default, alias = "en_sentence", deserialize_with = "loose_text")]
    pub back_example: Option<String>,
    #[serde(default, alias = "audio", deserialize_with = "loose_text")]
    pub audio_url: Option<String>,
}

/// Accepts a string, number, boolean, or null where a text field is
/// expected, rendering non-strings through their `Display` form.
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

//
// ─── NORMALIZATION ─────────────────────────────────────────────────────────────
//

/// Canonicalizes a loose deck payload into a strict, immutable `Deck`.
///
/// Total function: every malformed or missing field has a deterministic
/// fallback. Resulting card ids are non-empty and unique within the deck.
#[must_use]
pub fn normalize(source: DeckSource) -> Deck {
    let id = fallback(source.id, DEFAULT_DECK_ID);
    let title = fallback(source.title, DEFAULT_DECK_TITLE);

    let mut taken = HashSet::new();
    let mut cards = Vec::with_capacity(source.cards.len());
    for (position, card) in source.cards.into_iter().enumerate() {
        cards.push(Card {
            id: assign_id(card.id, card.note_id, position, &mut taken),
            front: text(card.front),
            front_example: text(card.front_example),
            back: text(card.back),
            back_example: text(card.back_example),
            audio_url: trimmed(card.audio_url),
        });
    }

    Deck::new(id, title, cards)
}

/// Picks a card id: source id, then external note id, then `card-{i+1}`.
///
/// A candidate colliding with an already-assigned id gets a `-{n}` suffix,
/// with the smallest `n >= i+1` that is free.
fn assign_id(
    id: Option<String>,
    note_id: Option<String>,
    position: usize,
    taken: &mut HashSet<String>,
) -> CardId {
    let base = trimmed(id)
        .or_else(|| trimmed(note_id))
        .unwrap_or_else(|| format!("card-{}", position + 1));

    let mut candidate = base.clone();
    let mut suffix = position + 1;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    CardId::new(candidate)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn text(value: Option<String>) -> String {
    value
        .map(|text| text.trim().to_owned())
        .unwrap_or_default()
}

fn fallback(value: Option<String>, default: &str) -> String {
    trimmed(value).unwrap_or_else(|| default.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
