//! Per-context exercise and anchor templates

mod library;

use crate::core::types::ContextKind;
use crate::session::interaction::{AnchorType, TaskType};

/// Fixed verb phrase substituted for `{verb}`
pub const GENERIC_VERB: &str = "handle the situation";

/// Fixed confusable stand-in substituted for `{incorrect}`
pub const CONFUSABLE: &str = "a commonly confused word";

/// Fixed distractors offered next to the target word in choice tasks
pub const CHOICE_DISTRACTORS: [&str; 2] = [CONFUSABLE, "an unrelated term"];

/// Scene text for each anchor archetype
#[derive(Debug)]
pub struct AnchorScenes {
    pub visual_metaphor: &'static str,
    pub story_fragment: &'static str,
    pub sensory_scene: &'static str,
    pub power_moment: &'static str,
}

/// Every template used for one context
#[derive(Debug)]
pub struct ContextTemplates {
    pub choice: &'static [&'static str],
    pub scenario: &'static [&'static str],
    pub completion: &'static [&'static str],
    pub application: &'static [&'static str],
    pub scenes: AnchorScenes,
    pub reflection: &'static str,
}

impl ContextTemplates {
    /// Templates for one task archetype; never empty
    pub fn tasks(&self, task_type: TaskType) -> &'static [&'static str] {
        match task_type {
            TaskType::Choice => self.choice,
            TaskType::Scenario => self.scenario,
            TaskType::Completion => self.completion,
            TaskType::Application => self.application,
        }
    }

    pub fn scene(&self, anchor_type: AnchorType) -> &'static str {
        match anchor_type {
            AnchorType::VisualMetaphor => self.scenes.visual_metaphor,
            AnchorType::StoryFragment => self.scenes.story_fragment,
            AnchorType::SensoryScene => self.scenes.sensory_scene,
            AnchorType::PowerMoment => self.scenes.power_moment,
        }
    }
}

/// Template set for a context; `General` is the generic fallback
pub fn templates_for(context: ContextKind) -> &'static ContextTemplates {
    match context {
        ContextKind::Work => &library::WORK,
        ContextKind::Academic => &library::ACADEMIC,
        ContextKind::Creative => &library::CREATIVE,
        ContextKind::Social => &library::SOCIAL,
        ContextKind::Technical => &library::TECHNICAL,
        ContextKind::General => &library::GENERAL,
    }
}

/// Substitute `{word}`, `{verb}` and `{incorrect}`
pub fn fill(template: &str, word: &str) -> String {
    template
        .replace("{word}", word)
        .replace("{verb}", GENERIC_VERB)
        .replace("{incorrect}", CONFUSABLE)
}

/// Instruction shown under a task prompt
pub fn task_instruction(task_type: TaskType) -> &'static str {
    match task_type {
        TaskType::Choice => "Pick the option that fits best.",
        TaskType::Scenario => "Respond to the scenario in a sentence or two.",
        TaskType::Completion => "Finish the sentence using the word.",
        TaskType::Application => "Apply the word in your own writing.",
    }
}

/// Lead-in shown above an anchor scene
pub fn anchor_prompt(anchor_type: AnchorType) -> &'static str {
    match anchor_type {
        AnchorType::VisualMetaphor => "See it:",
        AnchorType::StoryFragment => "Remember this moment:",
        AnchorType::SensoryScene => "Feel it:",
        AnchorType::PowerMoment => "Own it:",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS: [TaskType; 4] = [
        TaskType::Choice,
        TaskType::Scenario,
        TaskType::Completion,
        TaskType::Application,
    ];

    const ANCHORS: [AnchorType; 4] = [
        AnchorType::VisualMetaphor,
        AnchorType::StoryFragment,
        AnchorType::SensoryScene,
        AnchorType::PowerMoment,
    ];

    #[test]
    fn test_every_context_has_every_archetype() {
        for context in ContextKind::ALL {
            let templates = templates_for(context);
            for task in TASKS {
                assert!(!templates.tasks(task).is_empty(), "{} {:?}", context, task);
            }
            for anchor in ANCHORS {
                assert!(templates.scene(anchor).contains("{word}"), "{} {:?}", context, anchor);
            }
            assert!(templates.reflection.contains("{word}"));
        }
    }

    #[test]
    fn test_fill_replaces_all_placeholders() {
        let filled = fill("{word} / {verb} / {incorrect} / {word}", "nuance");
        assert_eq!(
            filled,
            format!("nuance / {} / {} / nuance", GENERIC_VERB, CONFUSABLE)
        );
        assert!(!filled.contains('{'));
    }

    #[test]
    fn test_task_templates_only_vary_by_word() {
        for context in ContextKind::ALL {
            let templates = templates_for(context);
            for task in TASKS {
                for template in templates.tasks(task) {
                    assert!(template.contains("{word}"), "{}", template);
                    assert!(!template.contains("___"), "{}", template);
                }
            }
            for template in templates.choice {
                assert!(template.contains("{incorrect}"), "{}", template);
            }
        }
    }

    #[test]
    fn test_no_template_leaves_unknown_placeholders() {
        for context in ContextKind::ALL {
            let templates = templates_for(context);
            for task in TASKS {
                for template in templates.tasks(task) {
                    let filled = fill(template, "w");
                    assert!(!filled.contains('{') && !filled.contains('}'), "{}", template);
                }
            }
        }
    }
}
