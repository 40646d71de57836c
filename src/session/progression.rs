//! Session progression state machine
//!
//! Loading -> Ready -> Complete, or Loading -> Error. Error and Complete are
//! terminal. Display layers read the controller through `&self` accessors;
//! only `load` and `advance` move it. A `Ready` controller can be saved as a
//! `SessionSnapshot` and resumed later.

use crate::catalog::WordEntry;
use crate::core::error::{MentorError, Result};
use crate::core::types::Timestamp;
use crate::profile::UserProfile;
use crate::session::builder::InteractionGenerator;
use crate::session::interaction::{SessionInteraction, TaskType};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Why a session could not start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionFailure {
    #[error("no words were selected")]
    NoWordsSelected,

    #[error("no interactions could be generated after {attempts} attempts")]
    GenerationFailed { attempts: u32 },

    #[error("all {dropped} generated interactions failed validation")]
    AllInvalid { dropped: usize },
}

impl SessionFailure {
    /// The single recovery action offered to the learner
    pub fn recovery_action(&self) -> &'static str {
        match self {
            SessionFailure::NoWordsSelected => "Return to word selection",
            SessionFailure::GenerationFailed { .. } | SessionFailure::AllInvalid { .. } => {
                "Restart the journey"
            }
        }
    }
}

impl From<SessionFailure> for MentorError {
    fn from(failure: SessionFailure) -> Self {
        match failure {
            SessionFailure::NoWordsSelected => MentorError::Input(failure.to_string()),
            SessionFailure::GenerationFailed { .. } => MentorError::Generation(failure.to_string()),
            SessionFailure::AllInvalid { .. } => MentorError::Validation(failure.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Ready,
    Error(SessionFailure),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    Answered {
        answer: String,
        /// `None` for open-ended tasks
        correct: Option<bool>,
    },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    pub word: String,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
    pub time_spent_ms: u64,
    pub responded_at: Timestamp,
}

impl InteractionResponse {
    pub fn answered(word: impl Into<String>, answer: impl Into<String>, correct: Option<bool>, time_spent_ms: u64) -> Self {
        Self {
            word: word.into(),
            outcome: ResponseOutcome::Answered {
                answer: answer.into(),
                correct,
            },
            time_spent_ms,
            responded_at: Utc::now(),
        }
    }

    pub fn skipped(word: impl Into<String>, time_spent_ms: u64) -> Self {
        Self {
            word: word.into(),
            outcome: ResponseOutcome::Skipped,
            time_spent_ms,
            responded_at: Utc::now(),
        }
    }

    /// Override the response time (replays, tests)
    pub fn at(mut self, responded_at: Timestamp) -> Self {
        self.responded_at = responded_at;
        self
    }

    pub fn is_completed(&self) -> bool {
        !matches!(self.outcome, ResponseOutcome::Skipped)
    }
}

/// Where the learner is within the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub current_index: usize,
    pub responses: Vec<InteractionResponse>,
    pub start_time: Timestamp,
    pub last_interaction_time: Timestamp,
}

/// Aggregates computed once the session completes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionMetrics {
    pub total_duration_secs: f64,
    pub average_secs_per_interaction: f64,
    pub display_types: BTreeSet<TaskType>,
    pub total_count: usize,
    pub completed_count: usize,
    pub skipped_count: usize,
    pub correct_count: usize,
}

/// What gets reported to the behavior tracker on completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub words: Vec<String>,
    pub completed_words: Vec<String>,
    pub completed_count: usize,
    pub total_count: usize,
    pub duration_seconds: f64,
}

/// Receives the completion report exactly once per session
pub trait CompletionReporter {
    fn report_completion(&mut self, report: &CompletionReport) -> Result<()>;
}

pub struct SessionController {
    state: SessionState,
    interactions: Vec<SessionInteraction>,
    progress: SessionProgress,
    metrics: Option<SessionMetrics>,
    reporter: Option<Box<dyn CompletionReporter>>,
    reported: bool,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// A controller in the `Loading` state
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: SessionState::Loading,
            interactions: Vec::new(),
            progress: SessionProgress {
                current_index: 0,
                responses: Vec::new(),
                start_time: now,
                last_interaction_time: now,
            },
            metrics: None,
            reporter: None,
            reported: false,
        }
    }

    /// Attach the collaborator notified on completion
    pub fn with_reporter(mut self, reporter: Box<dyn CompletionReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Create a controller and load it in one step
    pub fn start<G: InteractionGenerator + ?Sized>(
        words: &[WordEntry],
        profile: Option<&UserProfile>,
        generator: &mut G,
        retries: u32,
    ) -> Self {
        let mut controller = Self::new();
        if let Err(e) = controller.load(words, profile, generator, retries) {
            tracing::debug!(error = %e, "load rejected");
        }
        controller
    }

    /// Generate and validate interactions, leaving `Ready` or `Error`
    pub fn load<G: InteractionGenerator + ?Sized>(
        &mut self,
        words: &[WordEntry],
        profile: Option<&UserProfile>,
        generator: &mut G,
        retries: u32,
    ) -> Result<&SessionState> {
        if self.state != SessionState::Loading {
            return Err(MentorError::InvalidState(format!(
                "load called in state {:?}",
                self.state
            )));
        }

        self.state = match self.prepare(words, profile, generator, retries) {
            Ok(interactions) => {
                tracing::info!(count = interactions.len(), "session ready");
                let now = Utc::now();
                self.interactions = interactions;
                self.progress.start_time = now;
                self.progress.last_interaction_time = now;
                SessionState::Ready
            }
            Err(failure) => {
                tracing::warn!(%failure, "session failed to start");
                SessionState::Error(failure)
            }
        };

        Ok(&self.state)
    }

    fn prepare<G: InteractionGenerator + ?Sized>(
        &self,
        words: &[WordEntry],
        profile: Option<&UserProfile>,
        generator: &mut G,
        retries: u32,
    ) -> std::result::Result<Vec<SessionInteraction>, SessionFailure> {
        if words.is_empty() {
            return Err(SessionFailure::NoWordsSelected);
        }

        let attempts = retries + 1;
        let mut generated = Vec::new();
        for attempt in 1..=attempts {
            match generator.generate(words, profile) {
                Ok(interactions) if !interactions.is_empty() => {
                    generated = interactions;
                    break;
                }
                Ok(_) => tracing::warn!(attempt, "generation produced no interactions"),
                Err(e) => tracing::warn!(attempt, error = %e, "generation failed"),
            }
        }

        if generated.is_empty() {
            return Err(SessionFailure::GenerationFailed { attempts });
        }

        let total = generated.len();
        let valid: Vec<SessionInteraction> = generated
            .into_iter()
            .filter(|interaction| match interaction.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "dropping invalid interaction");
                    false
                }
            })
            .collect();

        if valid.is_empty() {
            return Err(SessionFailure::AllInvalid { dropped: total });
        }

        Ok(valid)
    }

    /// Record a response and move to the next interaction
    pub fn advance(&mut self, response: InteractionResponse) -> Result<&SessionState> {
        if self.state != SessionState::Ready {
            return Err(MentorError::InvalidState(format!(
                "advance called in state {:?}",
                self.state
            )));
        }

        if let Some(current) = self.current() {
            if !current.word.eq_ignore_ascii_case(&response.word) {
                tracing::debug!(expected = %current.word, got = %response.word, "response word differs from current interaction");
            }
        }

        self.progress.last_interaction_time = response.responded_at;
        self.progress.responses.push(response);
        self.progress.current_index += 1;

        if self.progress.current_index == self.interactions.len() {
            self.state = SessionState::Complete;
            self.finish();
        }

        Ok(&self.state)
    }

    fn finish(&mut self) {
        let duration = (self.progress.last_interaction_time - self.progress.start_time)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0;
        let total = self.interactions.len();
        let responses = &self.progress.responses;

        // Responses line up with interactions by index; the word comes from the interaction.
        let completed_words: Vec<String> = self
            .interactions
            .iter()
            .zip(responses)
            .filter(|(_, r)| r.is_completed())
            .map(|(i, _)| i.word.clone())
            .collect();
        let correct_count = responses
            .iter()
            .filter(|r| matches!(r.outcome, ResponseOutcome::Answered { correct: Some(true), .. }))
            .count();

        let metrics = SessionMetrics {
            total_duration_secs: duration,
            average_secs_per_interaction: if total > 0 { duration / total as f64 } else { 0.0 },
            display_types: self.interactions.iter().map(|i| i.display_type()).collect(),
            total_count: total,
            completed_count: completed_words.len(),
            skipped_count: responses.len() - completed_words.len(),
            correct_count,
        };
        tracing::info!(
            total,
            completed = metrics.completed_count,
            duration_secs = duration,
            "session complete"
        );
        self.metrics = Some(metrics);

        if self.reported {
            return;
        }
        self.reported = true;

        if let Some(reporter) = self.reporter.as_mut() {
            let report = CompletionReport {
                words: self.interactions.iter().map(|i| i.word.clone()).collect(),
                completed_count: completed_words.len(),
                completed_words,
                total_count: total,
                duration_seconds: duration,
            };
            if let Err(e) = reporter.report_completion(&report) {
                tracing::warn!(error = %e, "completion report failed");
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    pub fn failure(&self) -> Option<&SessionFailure> {
        match &self.state {
            SessionState::Error(failure) => Some(failure),
            _ => None,
        }
    }

    /// Interaction awaiting a response, if the session is ready
    pub fn current(&self) -> Option<&SessionInteraction> {
        if self.is_ready() {
            self.interactions.get(self.progress.current_index)
        } else {
            None
        }
    }

    pub fn current_index(&self) -> usize {
        self.progress.current_index
    }

    pub fn total(&self) -> usize {
        self.interactions.len()
    }

    pub fn interactions(&self) -> &[SessionInteraction] {
        &self.interactions
    }

    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    pub fn metrics(&self) -> Option<&SessionMetrics> {
        self.metrics.as_ref()
    }

    /// State needed to pick the session up again; `None` unless `Ready`
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        if !self.is_ready() {
            return None;
        }
        Some(SessionSnapshot {
            interactions: self.interactions.clone(),
            progress: self.progress.clone(),
        })
    }

    /// Rebuild a `Ready` controller from a snapshot
    pub fn resume(snapshot: SessionSnapshot) -> Result<Self> {
        let SessionSnapshot { interactions, progress } = snapshot;
        if interactions.is_empty() {
            return Err(MentorError::InvalidState("snapshot has no interactions".into()));
        }
        if progress.current_index >= interactions.len() || progress.responses.len() != progress.current_index {
            return Err(MentorError::InvalidState(format!(
                "snapshot at {} with {} responses does not fit {} interactions",
                progress.current_index,
                progress.responses.len(),
                interactions.len()
            )));
        }
        for interaction in &interactions {
            interaction.validate()?;
        }

        tracing::info!(at = progress.current_index, total = interactions.len(), "session resumed");
        Ok(Self {
            state: SessionState::Ready,
            interactions,
            progress,
            metrics: None,
            reporter: None,
            reported: false,
        })
    }
}

/// Serializable in-flight session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub interactions: Vec<SessionInteraction>,
    pub progress: SessionProgress,
}
