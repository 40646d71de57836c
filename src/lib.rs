//! Word Mentor - adaptive vocabulary micro-sessions

pub mod catalog;
pub mod core;
pub mod handoff;
pub mod llm;
pub mod profile;
pub mod saved;
pub mod session;
pub mod storage;
pub mod templates;
pub mod tracking;
