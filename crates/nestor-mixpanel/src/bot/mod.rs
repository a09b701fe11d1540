//! Mixpanel chat bot
//!
//! [`MixpanelBot`] routes chat text to one of three reports, queries the
//! analytics client once, and hands the formatted reply to the host.
//!
//! # Example
//!
//! ```rust,ignore
//! use nestor_mixpanel::bot::{BotConfig, MixpanelBot};
//! use nestor_mixpanel::interface::CollectingResponder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = MixpanelBot::from_config(BotConfig::from_env()?)?;
//!     let responder = CollectingResponder::new();
//!     bot.respond("mixpanel events Signup over the last 3 weeks", &responder).await?;
//!     Ok(())
//! }
//! ```

pub mod commands;

use crate::api::{AnalyticsClient, EventPropertiesQuery, EventsQuery, MixpanelClient};
use crate::config::MixpanelConfig;
use crate::error::Result;
use crate::format::{format_event_property_stats, format_event_stats, format_people};
use crate::interface::{BotPlatform, Responder};
use crate::time_period::TimePeriod;
use chrono::Utc;
use nestor_utils::{EnvSource, ProcessEnv};
use std::sync::Arc;
use tracing::{error, info};

pub use commands::{Command, CommandRouter};

/// Environment variable naming the bot
pub const BOT_NAME_VAR: &str = "NESTOR_BOT_NAME";

/// Configuration for the bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Mixpanel API configuration
    pub mixpanel: MixpanelConfig,
    /// Name the bot answers to
    pub name: String,
    /// Platform replies are rendered for
    pub platform: BotPlatform,
}

impl BotConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Create config from any environment-like source
    pub fn from_source(env: &impl EnvSource) -> Result<Self> {
        Ok(Self {
            mixpanel: MixpanelConfig::from_source(env)?,
            name: env.var(BOT_NAME_VAR).unwrap_or_else(|| "nestor".to_string()),
            platform: BotPlatform::default(),
        })
    }

    /// Set the bot name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the platform
    pub fn with_platform(mut self, platform: BotPlatform) -> Self {
        self.platform = platform;
        self
    }
}

/// The Mixpanel plugin: command router plus report handlers
pub struct MixpanelBot {
    client: Arc<dyn AnalyticsClient>,
    router: CommandRouter,
}

impl MixpanelBot {
    /// Create a bot over any analytics client
    pub fn new(client: Arc<dyn AnalyticsClient>, router: CommandRouter) -> Self {
        Self { client, router }
    }

    /// Create a bot talking to Mixpanel
    pub fn from_config(config: BotConfig) -> Result<Self> {
        let client = MixpanelClient::new(&config.mixpanel)?;
        Ok(Self::new(Arc::new(client), CommandRouter::new(config.name)))
    }

    /// Get the command router
    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    /// Handle chat text. Returns `false` when no command matched.
    pub async fn respond(&self, text: &str, responder: &dyn Responder) -> Result<bool> {
        let Some(command) = self.router.route(text) else {
            return Ok(false);
        };

        self.execute(command, responder).await?;
        Ok(true)
    }

    /// Run one command to completion
    pub async fn execute(&self, command: Command, responder: &dyn Responder) -> Result<()> {
        info!(command = command.description(), "Handling Mixpanel command");

        match command {
            Command::People => self.people(responder).await,
            Command::Events { event, period } => self.events(&event, &period, responder).await,
            Command::EventsByProperty {
                event,
                property,
                period,
            } => {
                self.events_by_property(&event, &property, &period, responder)
                    .await
            }
        }
    }

    /// People report
    pub async fn people(&self, responder: &dyn Responder) -> Result<()> {
        match self.client.engage().await {
            Ok(response) => responder.send(format_people(&response, Utc::now())).await?,
            Err(e) => error!(error = %e, "Mixpanel people request failed"),
        }

        responder.done().await;
        Ok(())
    }

    /// Single event report
    pub async fn events(&self, event: &str, period: &str, responder: &dyn Responder) -> Result<()> {
        let query = EventsQuery {
            event: event.to_string(),
            period: TimePeriod::parse(period),
        };

        match self.client.events(query).await {
            Ok(response) => responder.send(format_event_stats(event, &response)).await?,
            Err(e) => error!(error = %e, event, "Mixpanel events request failed"),
        }

        responder.done().await;
        Ok(())
    }

    /// Event-by-property report
    pub async fn events_by_property(
        &self,
        event: &str,
        property: &str,
        period: &str,
        responder: &dyn Responder,
    ) -> Result<()> {
        let query = EventPropertiesQuery {
            event: event.to_string(),
            property: property.to_string(),
            period: TimePeriod::parse(period),
        };

        match self.client.event_properties(query).await {
            Ok(response) => {
                responder
                    .send(format_event_property_stats(event, property, &response))
                    .await?;
            }
            Err(e) => error!(error = %e, event, property, "Mixpanel event properties request failed"),
        }

        responder.done().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EngageResponse, MockAnalyticsClient, PersonRecord, SegmentationResponse};
    use crate::error::MixpanelError;
    use crate::format::translate_error;
    use crate::interface::{CollectingResponder, Reply};
    use crate::time_period::TimeUnit;
    use serde_json::json;
    use std::collections::HashMap;

    fn bot(client: MockAnalyticsClient) -> MixpanelBot {
        MixpanelBot::new(Arc::new(client), CommandRouter::default())
    }

    struct FailingResponder;

    #[async_trait::async_trait]
    impl Responder for FailingResponder {
        async fn send(&self, _reply: Reply) -> Result<()> {
            Err(MixpanelError::SendError("channel closed".to_string()))
        }
    }

    fn transport_error() -> MixpanelError {
        MixpanelError::HttpError {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_bot_config_from_source() {
        let env = HashMap::from([
            ("NESTOR_MIXPANEL_API_KEY", "key"),
            ("NESTOR_MIXPANEL_API_SECRET", "secret"),
            (BOT_NAME_VAR, "hal"),
        ]);
        let config = BotConfig::from_source(&env).unwrap();
        assert_eq!(config.name, "hal");
        assert_eq!(config.platform, BotPlatform::Cli);
    }

    #[tokio::test]
    async fn test_people_sends_entries() {
        let mut client = MockAnalyticsClient::new();
        client.expect_engage().times(1).returning(|| {
            Ok(EngageResponse {
                results: vec![PersonRecord::with_properties(json!({"$name": "Ada"}))],
                ..Default::default()
            })
        });

        let responder = CollectingResponder::new();
        let handled = bot(client).respond("mixpanel people", &responder).await.unwrap();

        assert!(handled);
        let replies = responder.replies();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].entries().unwrap()[0].title, "Ada");
        assert_eq!(responder.done_count(), 1);
    }

    #[tokio::test]
    async fn test_events_query_uses_parsed_period() {
        let mut client = MockAnalyticsClient::new();
        client
            .expect_events()
            .withf(|query| {
                query.event == "Signup"
                    && query.period.interval == 3
                    && query.period.unit == TimeUnit::Week
            })
            .times(1)
            .returning(|_| {
                Ok(serde_json::from_value::<SegmentationResponse>(json!({
                    "data": {"series": ["2016-03-01"], "values": {"Signup": {"2016-03-01": 4}}}
                }))
                .unwrap())
            });

        let responder = CollectingResponder::new();
        bot(client)
            .respond("mixpanel events Signup over the last 3 weeks", &responder)
            .await
            .unwrap();

        let replies = responder.replies();
        assert_eq!(
            replies[0].entries().unwrap()[0].text.as_deref(),
            Some("Signup: 4")
        );
    }

    #[tokio::test]
    async fn test_default_period_is_widened_day() {
        let mut client = MockAnalyticsClient::new();
        client
            .expect_event_properties()
            .withf(|query| {
                query.property == "plan"
                    && query.period.interval == 2
                    && query.period.unit == TimeUnit::Day
            })
            .times(1)
            .returning(|_| Ok(SegmentationResponse::default()));

        let responder = CollectingResponder::new();
        bot(client)
            .respond("mixpanel events Signup by plan", &responder)
            .await
            .unwrap();

        let replies = responder.replies();
        assert!(replies[0].as_text().unwrap().contains("plan"));
    }

    #[tokio::test]
    async fn test_api_error_payload_is_translated() {
        let mut client = MockAnalyticsClient::new();
        client.expect_engage().returning(|| {
            Ok(EngageResponse {
                error: Some(json!("X")),
                ..Default::default()
            })
        });

        let responder = CollectingResponder::new();
        bot(client).respond("mixpanel people", &responder).await.unwrap();

        assert_eq!(responder.replies(), vec![translate_error("X")]);
        assert_eq!(responder.done_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_logged_not_sent() {
        let mut client = MockAnalyticsClient::new();
        client
            .expect_events()
            .times(1)
            .returning(|_| Err(transport_error()));

        let responder = CollectingResponder::new();
        let result = bot(client)
            .respond("mixpanel events Signup", &responder)
            .await;

        tokio_test::assert_ok!(result);
        assert!(responder.replies().is_empty());
        assert_eq!(responder.done_count(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_reaches_host() {
        let mut client = MockAnalyticsClient::new();
        client
            .expect_engage()
            .returning(|| Ok(EngageResponse::default()));
        client
            .expect_events()
            .returning(|_| Ok(SegmentationResponse::default()));

        let bot = bot(client);
        let result = bot.respond("mixpanel people", &FailingResponder).await;
        assert!(matches!(result, Err(MixpanelError::SendError(_))));

        let result = bot.respond("mixpanel events Signup", &FailingResponder).await;
        assert!(matches!(result, Err(MixpanelError::SendError(_))));
    }

    #[tokio::test]
    async fn test_unmatched_text_is_ignored() {
        let client = MockAnalyticsClient::new();
        let responder = CollectingResponder::new();
        let handled = bot(client).respond("what's up", &responder).await.unwrap();

        assert!(!handled);
        assert!(responder.replies().is_empty());
        assert_eq!(responder.done_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_people_text_reply() {
        let mut client = MockAnalyticsClient::new();
        client
            .expect_engage()
            .returning(|| Ok(EngageResponse::default()));

        let responder = CollectingResponder::new();
        bot(client)
            .execute(Command::People, &responder)
            .await
            .unwrap();

        assert_eq!(responder.replies(), vec![Reply::Entries(Vec::new())]);
    }
}
