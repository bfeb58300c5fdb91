//! Application layer - command handlers and question-set orchestration.

pub mod handlers;
pub mod questions;
