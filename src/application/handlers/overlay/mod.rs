//! Behavioral adjustment overlay job.

mod apply_adjustments;

pub use apply_adjustments::{ApplyAdjustmentsHandler, OverlayRunReport};
