//! Text generator adapters.

mod anthropic_generator;
mod mock_generator;

pub use anthropic_generator::{AnthropicConfig, AnthropicGenerator};
pub use mock_generator::MockGenerator;
