//! Command handlers exposed to the thin API layer.

pub mod assessment;
pub mod overlay;
