use std::sync::{Arc, Mutex};

use deckster_core::Clock;
use deckster_core::model::{CardId, Deck, DisplayField};
use deckster_core::normalize::{CardSource, DeckSource, normalize};
use deckster_core::time::fixed_now;
use services::player::{AudioPlayer, PlaybackError};
use services::{NoopPlayer, SESSION_STATE_KEY, SessionController};
use storage::store::{KeyValueStore, MemoryStore, StorageError};

fn deck(ids: &[&str]) -> Deck {
    deck_with_audio(ids, None)
}

fn deck_with_audio(ids: &[&str], audio: Option<&str>) -> Deck {
    normalize(DeckSource {
        id: Some("smoke".into()),
        title: Some("Smoke Deck".into()),
        cards: ids
            .iter()
            .map(|id| CardSource {
                id: Some((*id).to_owned()),
                front: Some(format!("{id}-front")),
                back: Some(format!("{id}-back")),
                audio_url: audio.map(str::to_owned),
                ..CardSource::default()
            })
            .collect(),
    })
}

fn controller(deck: Deck, store: &MemoryStore) -> SessionController {
    SessionController::with_clock(
        deck,
        Arc::new(store.clone()),
        Arc::new(NoopPlayer),
        Clock::fixed(fixed_now()),
    )
}

/// Store that records every write so tests can assert no-ops stay no-ops.
#[derive(Clone, Default)]
struct SpyStore {
    inner: MemoryStore,
    writes: Arc<Mutex<Vec<String>>>,
}

impl KeyValueStore for SpyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.lock().unwrap().push(format!("set {key}"));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.writes.lock().unwrap().push(format!("remove {key}"));
        self.inner.remove(key)
    }
}

/// Player that records every requested reference.
#[derive(Clone, Default)]
struct SpyPlayer {
    played: Arc<Mutex<Vec<String>>>,
}

impl AudioPlayer for SpyPlayer {
    fn play(&self, reference: &str) -> Result<(), PlaybackError> {
        self.played.lock().unwrap().push(reference.to_owned());
        Ok(())
    }
}

#[test]
fn three_card_study_cycle_into_review() {
    let store = MemoryStore::new();
    let mut controller = controller(deck(&["x", "y", "z"]), &store);

    // x unknown, y known, then past z back to x.
    controller.answer(false);
    controller.answer(true);
    controller.advance();
    assert_eq!(controller.current_card().unwrap().id, CardId::new("x"));

    let missed: Vec<&str> = controller.state().missed().iter().map(CardId::as_str).collect();
    assert_eq!(missed, ["x"]);

    controller.start_review();
    assert_eq!(controller.current_card().unwrap().id, CardId::new("x"));
    assert!(controller.progress().reviewing);

    controller.answer(true);
    assert!(controller.state().missed().is_empty());
    assert!(!controller.state().review_mode());
}

#[test]
fn review_queue_wraps_around() {
    let store = MemoryStore::new();
    let mut controller = controller(deck(&["a", "b", "c"]), &store);

    controller.answer(false); // miss a
    controller.answer(false); // miss b
    controller.start_review();

    controller.advance();
    controller.advance();
    assert_eq!(controller.current_card().unwrap().id, CardId::new("a"));
}

#[test]
fn persisted_state_survives_a_reload() {
    let store = MemoryStore::new();
    {
        let mut first = controller(deck(&["a", "b", "c"]), &store);
        first.answer(false); // miss a
        first.answer(false); // miss b, now on c
    }

    let reloaded = controller(deck(&["a", "b", "c"]), &store);
    assert_eq!(reloaded.current_card().unwrap().id, CardId::new("c"));
    let missed: Vec<&str> = reloaded.state().missed().iter().map(CardId::as_str).collect();
    assert_eq!(missed, ["a", "b"]);
    assert_eq!(reloaded.last_studied(), Some(fixed_now()));
}

#[test]
fn reload_prunes_ids_missing_from_the_new_deck() {
    let store = MemoryStore::new();
    {
        let mut first = controller(deck(&["a", "b", "c"]), &store);
        first.answer(false); // miss a
        first.answer(false); // miss b
    }

    // The collaborator supplies a shorter deck next session.
    let reloaded = controller(deck(&["b"]), &store);
    let missed: Vec<&str> = reloaded.state().missed().iter().map(CardId::as_str).collect();
    assert_eq!(missed, ["b"]);
    assert_eq!(reloaded.current_card().unwrap().id, CardId::new("b"));
}

#[test]
fn empty_deck_never_touches_the_store() {
    let spy = SpyStore::default();
    let player = SpyPlayer::default();
    let mut controller = SessionController::with_clock(
        deck(&[]),
        Arc::new(spy.clone()),
        Arc::new(player.clone()),
        Clock::fixed(fixed_now()),
    );

    assert!(controller.current_card().is_none());
    controller.flip();
    controller.answer(true);
    controller.answer(false);
    controller.advance();
    controller.start_review();
    controller.exit_review();
    controller.play_sound();

    assert!(spy.writes.lock().unwrap().is_empty());
    assert!(player.played.lock().unwrap().is_empty());
    assert_eq!(controller.progress().total, 0);
}

#[test]
fn reset_erases_the_persisted_entry_for_the_next_load() {
    let store = MemoryStore::new();
    {
        let mut first = controller(deck(&["a", "b"]), &store);
        first.answer(false);
        first.start_review();
        first.reset_progress();
    }
    assert_eq!(store.get(SESSION_STATE_KEY).unwrap(), None);

    let reloaded = controller(deck(&["a", "b"]), &store);
    assert_eq!(reloaded.state().position(), 0);
    assert!(reloaded.state().missed().is_empty());
    assert!(!reloaded.state().review_mode());
    assert_eq!(reloaded.last_studied(), None);
}

#[test]
fn play_sound_forwards_the_current_reference_once() {
    let store = MemoryStore::new();
    let player = SpyPlayer::default();
    let controller = SessionController::with_clock(
        deck_with_audio(&["a"], Some("/media/a.mp3")),
        Arc::new(store),
        Arc::new(player.clone()),
        Clock::fixed(fixed_now()),
    );

    controller.play_sound();
    controller.play_sound();
    assert_eq!(*player.played.lock().unwrap(), ["/media/a.mp3", "/media/a.mp3"]);
}

#[test]
fn play_sound_skips_cards_without_audio() {
    let store = MemoryStore::new();
    let player = SpyPlayer::default();
    let controller = SessionController::with_clock(
        deck(&["a"]),
        Arc::new(store),
        Arc::new(player.clone()),
        Clock::fixed(fixed_now()),
    );

    controller.play_sound();
    assert!(player.played.lock().unwrap().is_empty());
}

#[test]
fn display_preferences_round_trip_with_lenient_history() {
    let store = MemoryStore::new();
    {
        let mut first = controller(deck(&["a"]), &store);
        first.set_display(DisplayField::FrontExample, false);
    }

    let reloaded = controller(deck(&["a"]), &store);
    assert!(!reloaded.display().show_front_example());
    assert!(reloaded.display().show_back_example());

    // A save from before the back-example preference existed.
    store
        .set(services::DISPLAY_SETTINGS_KEY, r#"{"showFrontExample":false}"#)
        .unwrap();
    let legacy = controller(deck(&["a"]), &store);
    assert!(!legacy.display().show_front_example());
    assert!(legacy.display().show_back_example());
}

#[test]
fn exiting_review_resumes_the_linear_position() {
    let store = MemoryStore::new();
    let mut controller = controller(deck(&["a", "b", "c"]), &store);

    controller.answer(false); // miss a, now on b
    controller.start_review();
    assert_eq!(controller.current_card().unwrap().id, CardId::new("a"));

    controller.exit_review();
    assert_eq!(controller.current_card().unwrap().id, CardId::new("b"));
    let missed: Vec<&str> = controller.state().missed().iter().map(CardId::as_str).collect();
    assert_eq!(missed, ["a"]);
}
