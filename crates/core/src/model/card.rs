use crate::model::ids::CardId;

/// One front/back vocabulary pair with an optional pronunciation reference.
///
/// Cards are immutable once normalized; identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    /// Term shown on the front face.
    pub front: String,
    /// Example sentence for the front term; empty when the source had none.
    pub front_example: String,
    /// Translation shown on the back face.
    pub back: String,
    /// Example sentence for the translation; empty when the source had none.
    pub back_example: String,
    /// Pronunciation reference (URL or media path), if any.
    pub audio_url: Option<String>,
}

impl Card {
    /// Returns true when the card carries a pronunciation reference.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio_url.is_some()
    }
}
