//! Mixpanel insights for nestor chat bots
//!
//! This crate answers three chat commands with data from the Mixpanel data
//! export API:
//!
//! - `mixpanel people`: the ten most recently seen users
//! - `mixpanel events <event> [over the last N units]`: event counts per period
//! - `mixpanel events <event> by <property> [over ...]`: counts split by a property
//!
//! # Architecture
//!
//! - [`bot::CommandRouter`] turns chat text into a [`bot::Command`]
//! - [`bot::MixpanelBot`] runs the command against an [`api::AnalyticsClient`]
//! - [`format`] shapes API payloads into platform-agnostic [`interface::Reply`] values
//! - [`interface::Formatter`] renders replies for a platform
//!
//! # Example
//!
//! ```rust,ignore
//! use nestor_mixpanel::{BotConfig, CliBot, CliFormatter, MixpanelBot, WriterResponder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = MixpanelBot::from_config(BotConfig::from_env()?)?;
//!     let responder = WriterResponder::new(std::io::stdout(), Box::new(CliFormatter));
//!     CliBot::new(bot).handle_line("mixpanel people", &responder).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod format;
pub mod interface;
pub mod platforms;
pub mod time_period;

// Re-export main types for convenience
pub use api::{AnalyticsClient, MixpanelClient};
pub use bot::{BotConfig, Command, CommandRouter, MixpanelBot};
pub use config::MixpanelConfig;
pub use error::{MixpanelError, Result};
pub use interface::{BotPlatform, CliFormatter, Formatter, FormatterFactory, Reply, Responder};
pub use platforms::{CliBot, WriterResponder};
pub use time_period::{TimePeriod, TimeUnit};
