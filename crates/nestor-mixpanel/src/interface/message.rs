//! Message types exchanged with the bot host

use serde::{Deserialize, Serialize};

/// One titled value inside a rich message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl DisplayField {
    /// A field rendered side by side with its neighbours
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// A rich message: title, optional text, fields and thumbnail
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Plain-text summary for hosts that cannot render rich messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<DisplayField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
}

impl DisplayEntry {
    /// Create an entry with only a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the body text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the fallback text
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Append a field
    pub fn with_field(mut self, field: DisplayField) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the thumbnail URL
    pub fn with_thumb_url(mut self, url: impl Into<String>) -> Self {
        self.thumb_url = Some(url.into());
        self
    }
}

/// What a command sends back: plain text or a sequence of rich messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Reply {
    Text(String),
    Entries(Vec<DisplayEntry>),
}

impl Reply {
    /// Create a text reply
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// Text content, if this is a text reply
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Entries(_) => None,
        }
    }

    /// Entries, if this is a rich reply
    pub fn entries(&self) -> Option<&[DisplayEntry]> {
        match self {
            Self::Text(_) => None,
            Self::Entries(entries) => Some(entries),
        }
    }
}
