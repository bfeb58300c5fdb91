//! Domain layer - aggregates, value objects, and pure domain logic.

pub mod assessment;
pub mod foundation;
