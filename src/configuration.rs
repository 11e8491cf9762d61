pub mod config;

pub use config::{CliArgs, Config};
