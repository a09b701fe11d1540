//! Command parsing for the Mixpanel plugin
//!
//! Chat text is matched against the plugin's patterns after an optional
//! bot-name prefix is removed.

use regex::Regex;
use std::sync::LazyLock;

/// Period used when a command does not name one
pub const DEFAULT_PERIOD: &str = "day";

const PERIOD_SUFFIX: &str = r"(?:\s+over\s+(?:the\s+)?(?:(?:last|past)\s+)?(\d*\s*(?:minute|hour|day|week|month)s?))?";

static PEOPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^mixpanel\s+people\b").expect("valid people regex"));

static EVENTS_BY_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^mixpanel\s+events?\s+([\p{{L}}\p{{N}}_.:\- ]+?)\s+by\s+([\w.:\- ]+?){PERIOD_SUFFIX}\s*$"
    ))
    .expect("valid events-by-property regex")
});

static EVENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^mixpanel\s+events?\s+([\p{{L}}\p{{N}}_.:\- ]+?){PERIOD_SUFFIX}\s*$"
    ))
    .expect("valid events regex")
});

/// Parsed command from chat text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Most recently seen users
    People,
    /// One event over time
    Events { event: String, period: String },
    /// One event over time, split by a property
    EventsByProperty {
        event: String,
        property: String,
        period: String,
    },
}

impl Command {
    /// Usage strings shown to users
    pub fn suggestions() -> &'static [&'static str] {
        &[
            "mixpanel people",
            "mixpanel events <event-name> [time period]",
            "mixpanel events <event-name> by <property-name> [time period]",
        ]
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::People => "List the last 10 users of your app",
            Command::Events { .. } => "Event counts over time",
            Command::EventsByProperty { .. } => "Event counts split by a property",
        }
    }
}

/// Routes chat text to commands
#[derive(Debug, Clone)]
pub struct CommandRouter {
    bot_name: String,
}

impl CommandRouter {
    /// Create a router answering to `bot_name`
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
        }
    }

    /// Name the router strips from the start of messages
    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    /// Remove a leading `name`, `@name`, `name:` or `name,` addressing
    pub fn strip_addressing<'a>(&self, text: &'a str) -> &'a str {
        let text = text.trim();
        if self.bot_name.is_empty() {
            return text;
        }

        let unprefixed = text.strip_prefix('@').unwrap_or(text);
        let Some(head) = unprefixed.get(..self.bot_name.len()) else {
            return text;
        };
        if !head.eq_ignore_ascii_case(&self.bot_name) {
            return text;
        }

        let rest = &unprefixed[self.bot_name.len()..];
        match rest.strip_prefix([':', ',']) {
            Some(after) => after.trim_start(),
            None if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            None => text,
        }
    }

    /// True when the text is addressed to this plugin at all
    pub fn is_plugin_message(&self, text: &str) -> bool {
        self.strip_addressing(text)
            .get(..8)
            .is_some_and(|head| head.eq_ignore_ascii_case("mixpanel"))
    }

    /// Parse chat text into a command; `None` when nothing matches
    pub fn route(&self, text: &str) -> Option<Command> {
        let text = self.strip_addressing(text);

        if PEOPLE.is_match(text) {
            return Some(Command::People);
        }

        let period = |m: Option<regex::Match<'_>>| {
            m.map(|m| m.as_str().trim().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PERIOD.to_string())
        };

        if let Some(caps) = EVENTS_BY_PROPERTY.captures(text) {
            return Some(Command::EventsByProperty {
                event: caps[1].trim().to_string(),
                property: caps[2].trim().to_string(),
                period: period(caps.get(3)),
            });
        }

        if let Some(caps) = EVENTS.captures(text) {
            return Some(Command::Events {
                event: caps[1].trim().to_string(),
                period: period(caps.get(2)),
            });
        }

        None
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new("nestor")
    }
}
