//! Translation of API error payloads into chat replies

use crate::config::{API_KEY_VAR, API_SECRET_VAR};
use crate::interface::Reply;

/// Turn the `error` field of a Mixpanel payload into a user-facing reply
pub fn translate_error(message: &str) -> Reply {
    let lower = message.to_lowercase();

    let hint = if lower.contains("api key") || lower.contains("api_key") {
        Some(format!("Check that {API_KEY_VAR} is set to your project's API key."))
    } else if lower.contains("signature") || lower.contains("secret") {
        Some(format!(
            "Check that {API_SECRET_VAR} is set to your project's API secret."
        ))
    } else if lower.contains("expired") {
        Some("The request expired before it reached Mixpanel; the bot's clock may be off.".to_string())
    } else if lower.contains("rate limit") || lower.contains("too many") {
        Some("Mixpanel is rate limiting this project, try again in a minute.".to_string())
    } else {
        None
    };

    match hint {
        Some(hint) => Reply::Text(format!("Oops, Mixpanel returned an error: {message}. {hint}")),
        None => Reply::Text(format!("Oops, Mixpanel returned an error: {message}")),
    }
}
