//! Reply rendering per platform

use super::interface::BotPlatform;
use super::message::{DisplayEntry, Reply};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::json;

pub trait Formatter: Send + Sync {
    fn platform(&self) -> BotPlatform;
    fn format_reply(&self, reply: &Reply) -> String;
    fn format_error(&self, error: &str) -> String;
    fn format_suggestions(&self, suggestions: &[&str]) -> String;
}

pub struct CliFormatter;

impl CliFormatter {
    fn format_entry(entry: &DisplayEntry) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![entry.title.clone()]);

        if let Some(text) = &entry.text {
            table.add_row(vec![text.clone()]);
        }
        for field in &entry.fields {
            table.add_row(vec![format!("{}: {}", field.title, field.value)]);
        }
        if let Some(thumb) = &entry.thumb_url {
            table.add_row(vec![thumb.clone()]);
        }

        table.to_string()
    }
}

impl Formatter for CliFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Cli
    }

    fn format_reply(&self, reply: &Reply) -> String {
        match reply {
            Reply::Text(text) => text.clone(),
            Reply::Entries(entries) => entries
                .iter()
                .map(Self::format_entry)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {error}")
    }

    fn format_suggestions(&self, suggestions: &[&str]) -> String {
        let mut output = String::from("Try one of:\n");
        for suggestion in suggestions {
            output.push_str(&format!("  {suggestion}\n"));
        }
        output
    }
}

/// Renders replies as Slack message payloads
pub struct SlackFormatter;

impl Formatter for SlackFormatter {
    fn platform(&self) -> BotPlatform {
        BotPlatform::Slack
    }

    fn format_reply(&self, reply: &Reply) -> String {
        let payload = match reply {
            Reply::Text(text) => json!({ "text": text }),
            Reply::Entries(entries) => json!({ "attachments": entries }),
        };
        payload.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "text": format!(":x: {error}") }).to_string()
    }

    fn format_suggestions(&self, suggestions: &[&str]) -> String {
        let lines: Vec<String> = suggestions.iter().map(|s| format!("• `{s}`")).collect();
        json!({ "text": lines.join("\n") }).to_string()
    }
}

pub struct FormatterFactory;

impl FormatterFactory {
    pub fn create(platform: BotPlatform) -> Box<dyn Formatter> {
        match platform {
            BotPlatform::Cli => Box::new(CliFormatter),
            BotPlatform::Slack => Box::new(SlackFormatter),
        }
    }
}
