//! Bot host interfaces
//!
//! Platform-agnostic message types, the host's send primitive and reply
//! rendering.

pub mod formatter;
pub mod interface;
pub mod message;

pub use formatter::{CliFormatter, Formatter, FormatterFactory, SlackFormatter};
pub use interface::{BotPlatform, CollectingResponder, Responder};
pub use message::{DisplayEntry, DisplayField, Reply};
