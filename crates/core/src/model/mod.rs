mod card;
mod deck;
mod display;
mod ids;
mod session;

pub use card::Card;
pub use deck::Deck;
pub use display::{DisplayField, DisplaySettings};
pub use ids::CardId;
pub use session::{Progress, SessionState};
