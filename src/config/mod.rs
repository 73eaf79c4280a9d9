pub mod prepare;

pub use prepare::{load_config, parse_config, OutputConfig, RuntimeConfig};
