//! Foundation types shared across the domain layer.

mod errors;
mod ids;
mod likert;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AssessmentId, UserId};
pub use likert::{LikertValue, LIKERT_OPTIONS};
pub use timestamp::Timestamp;
