//! Micro-session content generation and progression
//!
//! words + profile -> builder -> interactions -> SessionController -> responses

pub mod builder;
pub mod interaction;
pub mod progression;
pub mod resume;

pub use builder::{build_interaction, build_interaction_as, select_anchor_type, InteractionGenerator, TemplateGenerator};
pub use interaction::{
    Anchor, AnchorType, Definition, LearningStep, SessionInteraction, Task, TaskKind, TaskType,
};
pub use progression::{
    CompletionReport, CompletionReporter, InteractionResponse, ResponseOutcome, SessionController,
    SessionFailure, SessionMetrics, SessionProgress, SessionSnapshot, SessionState,
};
pub use resume::ProgressStore;
