#![forbid(unsafe_code)]

pub mod controller;
pub mod player;

pub use deckster_core::Clock;

pub use controller::{
    DISPLAY_SETTINGS_KEY, SESSION_STATE_KEY, SessionController, load_display, load_state,
};
pub use player::{AudioPlayer, NoopPlayer, PlaybackError};
