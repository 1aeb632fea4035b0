//! Pronunciation playback for the terminal driver.
//!
//! References come straight from the deck: either full `http(s)` URLs or
//! converter-extracted paths like `/media/haus.mp3`, which resolve against a
//! local media root. Decoding and output run on a detached thread so the
//! stimulus loop never waits on audio.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::PathBuf;
use std::thread;

use rodio::{Decoder, OutputStream, Sink};
use tracing::{debug, warn};
use url::Url;

use services::player::{AudioPlayer, PlaybackError};

/// `rodio`-backed implementation of the playback port.
pub struct RodioPlayer {
    media_root: PathBuf,
}

#[derive(Debug, PartialEq)]
enum Source {
    Remote(Url),
    Local(PathBuf),
}

impl RodioPlayer {
    #[must_use]
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    fn resolve(&self, reference: &str) -> Source {
        if let Ok(url) = Url::parse(reference) {
            if matches!(url.scheme(), "http" | "https") {
                return Source::Remote(url);
            }
        }
        Source::Local(self.media_root.join(reference.trim_start_matches('/')))
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&self, reference: &str) -> Result<(), PlaybackError> {
        let source = self.resolve(reference);
        debug!(%reference, "spawning playback");

        thread::spawn(move || {
            if let Err(err) = play_blocking(&source) {
                warn!("playback failed: {err}");
            }
        });

        Ok(())
    }
}

fn play_blocking(source: &Source) -> Result<(), PlaybackError> {
    let (_stream, handle) =
        OutputStream::try_default().map_err(|err| PlaybackError::Output(err.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|err| PlaybackError::Output(err.to_string()))?;

    match source {
        Source::Remote(url) => {
            let response = reqwest::blocking::get(url.clone())
                .and_then(reqwest::blocking::Response::error_for_status)
                .map_err(|err| PlaybackError::Source(err.to_string()))?;
            let bytes = response
                .bytes()
                .map_err(|err| PlaybackError::Source(err.to_string()))?;
            let decoder = Decoder::new(Cursor::new(bytes.to_vec()))
                .map_err(|err| PlaybackError::Source(err.to_string()))?;
            sink.append(decoder);
        }
        Source::Local(path) => {
            let file = File::open(path)
                .map_err(|err| PlaybackError::Source(format!("{}: {err}", path.display())))?;
            let decoder = Decoder::new(BufReader::new(file))
                .map_err(|err| PlaybackError::Source(err.to_string()))?;
            sink.append(decoder);
        }
    }

    sink.sleep_until_end();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_references_resolve_remotely() {
        let player = RodioPlayer::new("/srv/media");
        let source = player.resolve("https://cdn.example.org/haus.mp3");
        assert_eq!(
            source,
            Source::Remote(Url::parse("https://cdn.example.org/haus.mp3").unwrap())
        );
    }

    #[test]
    fn media_paths_resolve_against_the_root() {
        let player = RodioPlayer::new("/srv/media");
        assert_eq!(
            player.resolve("/media/haus.mp3"),
            Source::Local(PathBuf::from("/srv/media/media/haus.mp3"))
        );
        assert_eq!(
            player.resolve("haus.mp3"),
            Source::Local(PathBuf::from("/srv/media/haus.mp3"))
        );
    }
}
