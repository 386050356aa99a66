mod commands;
pub mod find;

pub use commands::{Cli, OutputFormat};
