//! Command-line host
//!
//! Reads one message per line, runs it through the bot and prints the
//! rendered replies.

use crate::bot::{Command, MixpanelBot};
use crate::error::{MixpanelError, Result};
use crate::interface::{Formatter, Reply, Responder};
use async_trait::async_trait;
use std::io::{BufRead, Write};
use std::sync::Mutex;
use tracing::debug;

/// Responder that renders replies into any writer
pub struct WriterResponder<W> {
    writer: Mutex<W>,
    formatter: Box<dyn Formatter>,
}

impl<W: Write + Send> WriterResponder<W> {
    pub fn new(writer: W, formatter: Box<dyn Formatter>) -> Self {
        Self {
            writer: Mutex::new(writer),
            formatter,
        }
    }

    /// Write a line of plain text
    pub fn print(&self, text: &str) -> Result<()> {
        self.write(&format!("{text}\n"))
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| MixpanelError::SendError("output writer poisoned".to_string()))?;
        writer
            .write_all(text.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| MixpanelError::SendError(e.to_string()))
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl<W: Write + Send> Responder for WriterResponder<W> {
    async fn send(&self, reply: Reply) -> Result<()> {
        self.print(&self.formatter.format_reply(&reply))
    }

    async fn done(&self) {
        debug!("Command finished");
    }
}

/// Interactive command-line bot
pub struct CliBot {
    bot: MixpanelBot,
    interactive: bool,
}

impl CliBot {
    pub fn new(bot: MixpanelBot) -> Self {
        Self {
            bot,
            interactive: false,
        }
    }

    /// Show a prompt before each line
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Prompt shown before each line
    pub fn prompt(&self) -> String {
        format!("{}> ", self.bot.router().bot_name())
    }

    /// Handle one line of input
    ///
    /// Text that mentions the plugin but matches no command gets the usage
    /// list; anything else is ignored.
    pub async fn handle_line<W: Write + Send>(
        &self,
        line: &str,
        responder: &WriterResponder<W>,
    ) -> Result<()> {
        if self.bot.respond(line, responder).await? {
            return Ok(());
        }

        if self.bot.router().is_plugin_message(line) {
            let usage = responder
                .formatter
                .format_suggestions(Command::suggestions());
            responder.print(usage.trim_end())?;
        }

        Ok(())
    }

    /// Read lines until EOF or `exit`
    pub async fn run<R: BufRead, W: Write + Send>(
        &self,
        mut input: R,
        responder: &WriterResponder<W>,
    ) -> Result<()> {
        let mut buffer = String::new();
        loop {
            if self.interactive {
                responder.write(&self.prompt())?;
            }

            buffer.clear();
            let read = input
                .read_line(&mut buffer)
                .map_err(|e| MixpanelError::Other(e.to_string()))?;
            if read == 0 {
                break;
            }

            let line = buffer.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
                break;
            }

            if let Err(e) = self.handle_line(line, responder).await {
                responder.print(&responder.formatter.format_error(&e.to_string()))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EngageResponse, MockAnalyticsClient, PersonRecord};
    use crate::bot::CommandRouter;
    use crate::interface::CliFormatter;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;

    fn cli(client: MockAnalyticsClient) -> CliBot {
        CliBot::new(MixpanelBot::new(Arc::new(client), CommandRouter::default()))
    }

    fn output(responder: WriterResponder<Vec<u8>>) -> String {
        String::from_utf8(responder.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn test_run_renders_people_table() {
        let mut client = MockAnalyticsClient::new();
        client.expect_engage().times(1).returning(|| {
            Ok(EngageResponse {
                results: vec![PersonRecord::with_properties(json!({"$name": "Ada"}))],
                ..Default::default()
            })
        });

        let responder = WriterResponder::new(Vec::new(), Box::new(CliFormatter));
        cli(client)
            .run(Cursor::new("mixpanel people\nexit\nmixpanel people\n"), &responder)
            .await
            .unwrap();

        let output = output(responder);
        assert!(output.contains("Ada"));
        assert!(output.contains("Last Seen: unknown"));
    }

    #[tokio::test]
    async fn test_unknown_plugin_command_prints_usage() {
        let responder = WriterResponder::new(Vec::new(), Box::new(CliFormatter));
        cli(MockAnalyticsClient::new())
            .run(Cursor::new("mixpanel funnels\nhello\n"), &responder)
            .await
            .unwrap();

        let output = output(responder);
        assert!(output.contains("mixpanel events <event-name> [time period]"));
        assert_eq!(output.matches("Try one of").count(), 1);
    }

    #[test]
    fn test_prompt_uses_bot_name() {
        let bot = MixpanelBot::new(
            Arc::new(MockAnalyticsClient::new()),
            CommandRouter::new("hal"),
        );
        assert_eq!(CliBot::new(bot).prompt(), "hal> ");
    }

    #[tokio::test]
    async fn test_interactive_prints_prompt_per_line() {
        let responder = WriterResponder::new(Vec::new(), Box::new(CliFormatter));
        cli(MockAnalyticsClient::new())
            .interactive(true)
            .run(Cursor::new("hello\n"), &responder)
            .await
            .unwrap();

        assert_eq!(output(responder), "nestor> nestor> ");
    }
}
