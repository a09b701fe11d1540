//! Platform-specific bot hosts

pub mod cli;

pub use cli::{CliBot, WriterResponder};
