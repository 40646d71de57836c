//! Compose a three-step interaction for one word
//!
//! The builder is a pure function of the word, the optional profile and the
//! random source. It never fails: absent profile data falls back to the
//! generic context and the default level.

use crate::catalog::WordEntry;
use crate::core::error::Result;
use crate::core::types::ContextKind;
use crate::profile::{difficulty_level_of, dominant_context_of, UserProfile};
use crate::session::interaction::{
    Anchor, AnchorType, Definition, SessionInteraction, Task, TaskKind, TaskType,
};
use crate::templates::{self, CHOICE_DISTRACTORS};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

const FALLBACK_PROMPT: &str = "Use \"{word}\" in a sentence of your own.";

/// Build an interaction using the archetype the profile's level calls for
pub fn build_interaction<R: Rng + ?Sized>(
    word: &WordEntry,
    profile: Option<&UserProfile>,
    rng: &mut R,
) -> SessionInteraction {
    let task_type = TaskType::for_level(difficulty_level_of(profile));
    build_interaction_as(word, profile, task_type, rng)
}

/// Build an interaction with an explicit task archetype
pub fn build_interaction_as<R: Rng + ?Sized>(
    word: &WordEntry,
    profile: Option<&UserProfile>,
    task_type: TaskType,
    rng: &mut R,
) -> SessionInteraction {
    let context = dominant_context_of(profile);
    let task = build_task(&word.word, &context, task_type, rng);
    let anchor = build_anchor(word, &context);

    tracing::debug!(
        word = %word.word,
        context = %context,
        task = %task.task_type(),
        anchor = %anchor.anchor_type,
        "built interaction"
    );

    SessionInteraction {
        word: word.word.clone(),
        difficulty: word.difficulty,
        cluster: word.cluster.clone(),
        definition: Definition {
            text: word.definition.clone(),
            part_of_speech: word.part_of_speech.clone(),
        },
        task,
        anchor,
    }
}

/// Anchor archetype from cluster keywords, then part of speech
///
/// Checked in order: emotion/feeling/abstract, technical/concrete/business,
/// verb, otherwise story fragment.
pub fn select_anchor_type(cluster: &str, part_of_speech: &str) -> AnchorType {
    let cluster = cluster.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| cluster.contains(n));

    if contains_any(&["emotion", "feeling", "abstract"]) {
        AnchorType::SensoryScene
    } else if contains_any(&["technical", "concrete", "business"]) {
        AnchorType::VisualMetaphor
    } else if part_of_speech.trim().eq_ignore_ascii_case("verb") {
        AnchorType::PowerMoment
    } else {
        AnchorType::StoryFragment
    }
}

fn build_task<R: Rng + ?Sized>(word: &str, context: &str, task_type: TaskType, rng: &mut R) -> Task {
    let set = templates::templates_for(ContextKind::from_name(context));
    let template = set
        .tasks(task_type)
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_PROMPT);

    let kind = match task_type {
        TaskType::Scenario => TaskKind::Scenario,
        TaskType::Completion => TaskKind::Completion,
        TaskType::Application => TaskKind::Application,
        TaskType::Choice => {
            let mut options: Vec<String> = std::iter::once(word.to_string())
                .chain(CHOICE_DISTRACTORS.iter().map(|d| d.to_string()))
                .collect();
            options.shuffle(rng);
            TaskKind::Choice {
                options,
                correct_answer: word.to_string(),
            }
        }
    };

    Task {
        kind,
        prompt: templates::fill(template, word),
        context: context.to_string(),
        instruction: templates::task_instruction(task_type).to_string(),
    }
}

fn build_anchor(word: &WordEntry, context: &str) -> Anchor {
    let set = templates::templates_for(ContextKind::from_name(context));
    let anchor_type = select_anchor_type(&word.cluster, &word.part_of_speech);

    Anchor {
        anchor_type,
        prompt: templates::anchor_prompt(anchor_type).to_string(),
        scene: templates::fill(set.scene(anchor_type), &word.word),
        context: context.to_string(),
        reflection: templates::fill(set.reflection, &word.word),
    }
}

/// Source of interactions for a session
pub trait InteractionGenerator {
    /// Produce interactions for the selected words
    ///
    /// An empty result or an error counts as a failed attempt.
    fn generate(
        &mut self,
        words: &[WordEntry],
        profile: Option<&UserProfile>,
    ) -> Result<Vec<SessionInteraction>>;
}

/// Template-backed generator; one interaction per word
pub struct TemplateGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
    task_override: Option<TaskType>,
}

impl<R: Rng> TemplateGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            task_override: None,
        }
    }

    /// Force every task to one archetype
    pub fn with_task_type(mut self, task_type: TaskType) -> Self {
        self.task_override = Some(task_type);
        self
    }
}

impl<R: Rng> InteractionGenerator for TemplateGenerator<R> {
    fn generate(
        &mut self,
        words: &[WordEntry],
        profile: Option<&UserProfile>,
    ) -> Result<Vec<SessionInteraction>> {
        Ok(words
            .iter()
            .map(|word| match self.task_override {
                Some(task_type) => build_interaction_as(word, profile, task_type, &mut self.rng),
                None => build_interaction(word, profile, &mut self.rng),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::core::config::ScoringConfig;
    use crate::core::types::UserId;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn profile_at(level: f64) -> UserProfile {
        let mut profile = UserProfile::new(UserId::new("t"), &ScoringConfig::default());
        profile.vocabulary_level.estimated_level = level;
        profile
    }

    fn word(name: &str) -> WordEntry {
        Catalog::builtin().unwrap().find(name).cloned().unwrap()
    }

    #[test]
    fn test_task_type_follows_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let w = word("nuance");
        let cases = [(3.0, TaskType::Choice), (4.0, TaskType::Scenario), (5.0, TaskType::Scenario),
            (7.0, TaskType::Application), (8.0, TaskType::Application)];
        for (level, expected) in cases {
            let profile = profile_at(level);
            let interaction = build_interaction(&w, Some(&profile), &mut rng);
            assert_eq!(interaction.task.task_type(), expected, "level {}", level);
        }
    }

    #[test]
    fn test_no_profile_uses_general_scenario() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let interaction = build_interaction(&word("synergy"), None, &mut rng);
        assert_eq!(interaction.task.task_type(), TaskType::Scenario);
        assert_eq!(interaction.task.context, "general");
        assert_eq!(interaction.anchor.context, "general");
        assert!(interaction.task.prompt.contains("synergy"));
    }

    #[test]
    fn test_dominant_context_selects_templates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut profile = profile_at(5.0);
        profile.context_preferences.insert("technical".into(), 3.0);
        profile.context_preferences.insert("work".into(), 1.0);

        let interaction = build_interaction(&word("latency"), Some(&profile), &mut rng);
        assert_eq!(interaction.task.context, "technical");
        let technical = templates::templates_for(ContextKind::Technical);
        let expected: Vec<String> = technical
            .scenario
            .iter()
            .map(|t| templates::fill(t, "latency"))
            .collect();
        assert!(expected.contains(&interaction.task.prompt));
    }

    #[test]
    fn test_unrecognized_context_falls_back_to_generic() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut profile = profile_at(5.0);
        profile.context_preferences.insert("gardening".into(), 9.0);

        let interaction = build_interaction(&word("nuance"), Some(&profile), &mut rng);
        assert_eq!(interaction.task.context, "gardening");
        let general = templates::templates_for(ContextKind::General);
        assert!(general
            .scenario
            .iter()
            .any(|t| templates::fill(t, "nuance") == interaction.task.prompt));
    }

    #[test]
    fn test_same_seed_same_interaction() {
        let w = word("ephemeral");
        let a = build_interaction(&w, None, &mut ChaCha8Rng::seed_from_u64(99));
        let b = build_interaction(&w, None, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_anchor_selection_priority() {
        assert_eq!(select_anchor_type("Emotions & Feelings", "verb"), AnchorType::SensoryScene);
        assert_eq!(select_anchor_type("Abstract Ideas", "noun"), AnchorType::SensoryScene);
        assert_eq!(select_anchor_type("Work & Business", "verb"), AnchorType::VisualMetaphor);
        assert_eq!(select_anchor_type("Technical & Concrete", "noun"), AnchorType::VisualMetaphor);
        assert_eq!(select_anchor_type("Literary", "Verb"), AnchorType::PowerMoment);
        assert_eq!(select_anchor_type("Literary", "noun"), AnchorType::StoryFragment);
        assert_eq!(select_anchor_type("", ""), AnchorType::StoryFragment);
    }

    #[test]
    fn test_choice_options_contain_answer() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let profile = profile_at(2.0);
        let interaction = build_interaction(&word("elated"), Some(&profile), &mut rng);
        match &interaction.task.kind {
            TaskKind::Choice { options, correct_answer } => {
                assert_eq!(correct_answer, "elated");
                assert_eq!(options.len(), 1 + CHOICE_DISTRACTORS.len());
                assert!(options.contains(correct_answer));
            }
            other => panic!("expected choice task, got {:?}", other),
        }
        assert!(interaction.validate().is_ok());
    }

    #[test]
    fn test_generator_override() {
        let mut generator =
            TemplateGenerator::new(ChaCha8Rng::seed_from_u64(0)).with_task_type(TaskType::Completion);
        let words = vec![word("nuance"), word("pivot")];
        let interactions = generator.generate(&words, None).unwrap();
        assert_eq!(interactions.len(), 2);
        assert!(interactions
            .iter()
            .all(|i| i.task.task_type() == TaskType::Completion));
    }

    proptest! {
        #[test]
        fn prop_interaction_always_complete(
            level in -5.0f64..15.0,
            seed in any::<u64>(),
            text in "[a-z]{0,12}",
            has_profile in any::<bool>(),
        ) {
            let entry = WordEntry::placeholder(&text);
            let profile = profile_at(level);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let interaction = build_interaction(
                &entry,
                if has_profile { Some(&profile) } else { None },
                &mut rng,
            );
            prop_assert!(!interaction.task.prompt.trim().is_empty());
            prop_assert!(!interaction.anchor.scene.trim().is_empty());
            prop_assert!(!interaction.anchor.reflection.is_empty());
        }
    }
}
