use thiserror::Error;
use tracing::debug;

/// Errors surfaced by audio backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("audio source unavailable: {0}")]
    Source(String),
}

/// Fire-and-forget audio playback port.
///
/// `play` hands the reference off and returns immediately; the session
/// controller never observes completion or failure of the playback itself.
pub trait AudioPlayer: Send + Sync {
    /// Begins playback of the given reference without blocking the caller.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackError` when the request cannot even be handed off.
    fn play(&self, reference: &str) -> Result<(), PlaybackError>;
}

/// Player that drops every request; for silent environments and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlayer;

impl AudioPlayer for NoopPlayer {
    fn play(&self, reference: &str) -> Result<(), PlaybackError> {
        debug!(%reference, "audio request dropped, no player configured");
        Ok(())
    }
}
