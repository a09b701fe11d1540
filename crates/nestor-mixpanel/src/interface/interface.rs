//! Host-facing abstractions
//!
//! The bot host owns message delivery. Handlers see it only through
//! [`Responder`].

use super::message::Reply;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotPlatform {
    /// Command-line interface
    #[default]
    Cli,

    /// Slack-style rich attachments
    Slack,
}

impl std::fmt::Display for BotPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotPlatform::Cli => write!(f, "cli"),
            BotPlatform::Slack => write!(f, "slack"),
        }
    }
}

impl std::str::FromStr for BotPlatform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" => Ok(Self::Cli),
            "slack" => Ok(Self::Slack),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// The host's send primitive and command-lifecycle callback
#[async_trait]
pub trait Responder: Send + Sync {
    /// Deliver a reply to the user
    async fn send(&self, reply: Reply) -> Result<()>;

    /// Signal that the command has finished
    async fn done(&self) {}
}

/// A responder that keeps everything it is given
///
/// Useful for tests and for hosts that batch replies.
#[derive(Debug, Default)]
pub struct CollectingResponder {
    replies: Mutex<Vec<Reply>>,
    done: AtomicUsize,
}

impl CollectingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies sent so far
    pub fn replies(&self) -> Vec<Reply> {
        self.replies
            .lock()
            .map(|replies| replies.clone())
            .unwrap_or_default()
    }

    /// How many times `done` was signalled
    pub fn done_count(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Responder for CollectingResponder {
    async fn send(&self, reply: Reply) -> Result<()> {
        self.replies
            .lock()
            .map_err(|e| crate::error::MixpanelError::SendError(e.to_string()))?
            .push(reply);
        Ok(())
    }

    async fn done(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("Slack".parse::<BotPlatform>(), Ok(BotPlatform::Slack));
        assert_eq!("cli".parse::<BotPlatform>(), Ok(BotPlatform::Cli));
        assert!("irc".parse::<BotPlatform>().is_err());
        assert_eq!(BotPlatform::Slack.to_string(), "slack");
    }

    #[tokio::test]
    async fn test_collecting_responder() {
        let responder = CollectingResponder::new();
        tokio_test::assert_ok!(responder.send(Reply::text("hi")).await);
        responder.done().await;

        assert_eq!(responder.replies(), vec![Reply::text("hi")]);
        assert_eq!(responder.done_count(), 1);
    }
}
