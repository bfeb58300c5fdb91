//! Question-set acquisition: adaptive generation with defensive parsing.

mod parse;
mod provider;

pub use parse::{extract_candidates, CandidateQuestion};
pub use provider::AdaptiveQuestionProvider;
