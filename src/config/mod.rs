//! JSON configuration for the command-line tools.
pub mod runtime;

pub use runtime::{load_config, parse_config, OutputConfig, RuntimeConfig};
