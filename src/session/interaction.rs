//! Three-step interaction produced for each selected word
//!
//! Task and anchor archetypes are closed enums, so a built interaction is
//! structurally complete; `validate` only checks content emptiness, which
//! matters for interactions coming from generators other than the template
//! builder.

use crate::core::error::{MentorError, Result};
use serde::{Deserialize, Serialize};

/// Exercise archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[display(fmt = "scenario")]
    Scenario,
    #[display(fmt = "completion")]
    Completion,
    #[display(fmt = "choice")]
    Choice,
    #[display(fmt = "application")]
    Application,
}

impl TaskType {
    /// Archetype for an estimated level: `< 4` choice, `< 7` scenario, else application
    pub fn for_level(level: f64) -> Self {
        if level < 4.0 {
            TaskType::Choice
        } else if level < 7.0 {
            TaskType::Scenario
        } else {
            TaskType::Application
        }
    }
}

/// Memory-anchor archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum AnchorType {
    #[display(fmt = "visual_metaphor")]
    VisualMetaphor,
    #[display(fmt = "story_fragment")]
    StoryFragment,
    #[display(fmt = "sensory_scene")]
    SensoryScene,
    #[display(fmt = "power_moment")]
    PowerMoment,
}

/// Step one: what the word means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub part_of_speech: String,
}

/// Archetype-specific task payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    Scenario,
    Completion,
    Choice {
        options: Vec<String>,
        correct_answer: String,
    },
    Application,
}

/// Step two: the exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(flatten)]
    pub kind: TaskKind,
    pub prompt: String,
    pub context: String,
    pub instruction: String,
}

impl Task {
    pub fn task_type(&self) -> TaskType {
        match self.kind {
            TaskKind::Scenario => TaskType::Scenario,
            TaskKind::Completion => TaskType::Completion,
            TaskKind::Choice { .. } => TaskType::Choice,
            TaskKind::Application => TaskType::Application,
        }
    }

    /// Grade a free-text answer. Only choice tasks have a right answer.
    pub fn check(&self, answer: &str) -> Option<bool> {
        match &self.kind {
            TaskKind::Choice { correct_answer, .. } => {
                Some(answer.trim().eq_ignore_ascii_case(correct_answer.trim()))
            }
            _ => None,
        }
    }
}

/// Step three: the emotional anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(rename = "type")]
    pub anchor_type: AnchorType,
    pub prompt: String,
    pub scene: String,
    pub context: String,
    pub reflection: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInteraction {
    pub word: String,
    pub difficulty: u8,
    pub cluster: String,
    pub definition: Definition,
    pub task: Task,
    pub anchor: Anchor,
}

impl SessionInteraction {
    /// Label of the display used for this interaction (the task archetype)
    pub fn display_type(&self) -> TaskType {
        self.task.task_type()
    }

    /// Reject interactions a learner could not work through
    pub fn validate(&self) -> Result<()> {
        if self.word.trim().is_empty() {
            return Err(MentorError::Validation("interaction has no word".into()));
        }
        if self.task.prompt.trim().is_empty() {
            return Err(MentorError::Validation(format!("{}: empty task prompt", self.word)));
        }
        if self.anchor.scene.trim().is_empty() {
            return Err(MentorError::Validation(format!("{}: empty anchor scene", self.word)));
        }
        if let TaskKind::Choice { options, correct_answer } = &self.task.kind {
            if !options.contains(correct_answer) {
                return Err(MentorError::Validation(format!(
                    "{}: correct answer missing from options",
                    self.word
                )));
            }
        }
        Ok(())
    }
}

/// The three steps presented for one interaction, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningStep {
    Definition,
    Task,
    Anchor,
}

impl LearningStep {
    pub const ORDER: [LearningStep; 3] = [LearningStep::Definition, LearningStep::Task, LearningStep::Anchor];

    /// Following step, or `None` after the anchor
    pub fn next(self) -> Option<Self> {
        match self {
            LearningStep::Definition => Some(LearningStep::Task),
            LearningStep::Task => Some(LearningStep::Anchor),
            LearningStep::Anchor => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            LearningStep::Definition => "Definition",
            LearningStep::Task => "Exercise",
            LearningStep::Anchor => "Anchor",
        }
    }
}
