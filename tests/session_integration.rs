//! End-to-end session flow: selection, handoff, session, profile update

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

use word_mentor::catalog::Catalog;
use word_mentor::core::{MentorConfig, UserId};
use word_mentor::handoff::{HandoffContext, SessionHandoff};
use word_mentor::session::{
    InteractionResponse, SessionController, SessionFailure, SessionState, TaskType, TemplateGenerator,
};
use word_mentor::storage::Storage;
use word_mentor::tracking::{BehaviorTracker, EventKind};

fn strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

struct Fixture {
    config: MentorConfig,
    catalog: Arc<Catalog>,
    storage: Storage,
    tracker: BehaviorTracker,
    user: UserId,
}

fn fixture() -> Fixture {
    let config = MentorConfig::default();
    let catalog = Arc::new(Catalog::builtin().unwrap());
    let storage = Storage::in_memory();
    let tracker = BehaviorTracker::new(storage.persistent.clone(), catalog.clone(), &config);
    Fixture {
        config,
        catalog,
        storage,
        tracker,
        user: UserId::new("learner"),
    }
}

#[test]
fn test_session_without_profile_uses_general_scenarios() {
    let f = fixture();
    let words = f.catalog.resolve(&strings(&["synergy", "nuance"]));
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(7));

    let controller = SessionController::start(&words, None, &mut generator, 0);

    assert!(controller.is_ready());
    assert_eq!(controller.total(), 2);
    for interaction in controller.interactions() {
        assert_eq!(interaction.task.task_type(), TaskType::Scenario);
        assert_eq!(interaction.task.context, "general");
        assert!(!interaction.task.prompt.is_empty());
        assert!(!interaction.anchor.scene.is_empty());
    }
}

#[test]
fn test_full_flow_updates_profile() {
    let f = fixture();
    let selected = strings(&["synergy", "nuance"]);
    let available: Vec<String> = f.catalog.entries().iter().map(|e| e.word.clone()).collect();

    f.tracker.track_word_selection(&f.user, &selected, &available);
    let handoff = SessionHandoff::from_config(&f.config.handoff, &f.user);
    assert_eq!(handoff.publish(&f.storage, &selected), 2);

    let words = handoff.resolve(&HandoffContext::new(&f.storage, None)).unwrap();
    assert_eq!(words, selected);

    let profile = f.tracker.profiles().load(&f.user);
    assert_eq!(profile.context_preferences.get("work"), Some(&1.0));
    assert_eq!(profile.context_preferences.get("academic"), Some(&1.0));
    assert_eq!(profile.context_preferences.get("creative"), Some(&1.0));

    let entries = f.catalog.resolve(&words);
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(11));
    let mut controller = SessionController::new().with_reporter(Box::new(f.tracker.reporter(&f.user)));
    controller.load(&entries, Some(&profile), &mut generator, 2).unwrap();
    assert!(controller.is_ready());

    let state = controller
        .advance(InteractionResponse::answered("synergy", "we combined teams", None, 4_000))
        .unwrap();
    assert_eq!(state, &SessionState::Ready);
    assert_eq!(controller.current_index(), 1);

    controller
        .advance(InteractionResponse::answered("nuance", "a subtle shade", None, 6_000))
        .unwrap();
    assert!(controller.is_complete());
    assert_eq!(controller.current_index(), 2);
    assert!(controller.advance(InteractionResponse::skipped("extra", 0)).is_err());

    let metrics = controller.metrics().unwrap();
    assert_eq!(metrics.total_count, 2);
    assert_eq!(metrics.completed_count, 2);

    let profile = f.tracker.profiles().load(&f.user);
    let history: Vec<(&str, bool)> = profile
        .word_history
        .iter()
        .map(|h| (h.word.as_str(), h.completed))
        .collect();
    assert_eq!(history, vec![("synergy", true), ("nuance", true)]);
    assert_eq!(profile.vocabulary_level.estimated_level, 5.25);

    let events = f.tracker.events(&f.user);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0].kind, EventKind::WordSelection { .. }));
    match &events[1].kind {
        EventKind::SessionCompletion { completed_count, total_count, .. } => {
            assert_eq!((*completed_count, *total_count), (2, 2));
        }
        other => panic!("expected completion event, got {:?}", other),
    }
}

#[test]
fn test_skipped_words_are_recorded_incomplete() {
    let f = fixture();
    let entries = f.catalog.resolve(&strings(&["pivot", "elated", "entropy"]));
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(3));
    let mut controller = SessionController::new().with_reporter(Box::new(f.tracker.reporter(&f.user)));
    controller.load(&entries, None, &mut generator, 0).unwrap();

    controller.advance(InteractionResponse::answered("pivot", "we pivoted", None, 1_000)).unwrap();
    controller.advance(InteractionResponse::skipped("elated", 500)).unwrap();
    controller.advance(InteractionResponse::skipped("entropy", 500)).unwrap();

    let metrics = controller.metrics().unwrap();
    assert_eq!(metrics.completed_count, 1);
    assert_eq!(metrics.skipped_count, 2);

    let profile = f.tracker.profiles().load(&f.user);
    assert_eq!(profile.word_history.len(), 3);
    assert_eq!(profile.word_history.iter().filter(|h| h.completed).count(), 1);
    // One in three is below the completion ratio that raises the level
    assert_eq!(profile.vocabulary_level.estimated_level, 5.0);
}

#[test]
fn test_history_records_session_words_even_when_response_word_differs() {
    let f = fixture();
    let entries = f.catalog.resolve(&strings(&["synergy", "nuance"]));
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(13));
    let mut controller = SessionController::new().with_reporter(Box::new(f.tracker.reporter(&f.user)));
    controller.load(&entries, None, &mut generator, 0).unwrap();

    controller.advance(InteractionResponse::answered("typo", "x", None, 100)).unwrap();
    controller.advance(InteractionResponse::answered("nuance", "y", None, 100)).unwrap();
    assert!(controller.is_complete());

    let profile = f.tracker.profiles().load(&f.user);
    let history: Vec<(&str, bool)> = profile
        .word_history
        .iter()
        .map(|h| (h.word.as_str(), h.completed))
        .collect();
    assert_eq!(history, vec![("synergy", true), ("nuance", true)]);
}

#[test]
fn test_unknown_word_still_gets_an_interaction() {
    let f = fixture();
    let entries = f.catalog.resolve(&strings(&["flibbertigibbet"]));
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(5));
    let controller = SessionController::start(&entries, None, &mut generator, 0);

    assert!(controller.is_ready());
    let interaction = controller.current().unwrap();
    assert_eq!(interaction.word, "flibbertigibbet");
    assert_eq!(interaction.cluster, "general");
    assert_eq!(interaction.difficulty, 5);
}

#[test]
fn test_missing_handoff_fails_with_no_words() {
    let f = fixture();
    let handoff = SessionHandoff::from_config(&f.config.handoff, &f.user);
    f.storage.session.set("selected_words:learner", "{broken").unwrap();

    let words = handoff
        .resolve(&HandoffContext::new(&f.storage, Some("/session?other=1")))
        .unwrap_or_default();
    let entries = f.catalog.resolve(&words);
    let mut generator = TemplateGenerator::new(ChaCha8Rng::seed_from_u64(1));
    let controller = SessionController::start(&entries, None, &mut generator, 2);

    assert_eq!(controller.failure(), Some(&SessionFailure::NoWordsSelected));
    assert!(controller.current().is_none());
    assert!(f.tracker.events(&f.user).is_empty());
}
