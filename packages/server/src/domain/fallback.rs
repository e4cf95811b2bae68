//! Canned content returned when the backend cannot answer.

use serde_json::{Value, json};

use super::error::BackendError;

/// Chat reply used when the backend is unavailable
pub const CHAT_APOLOGY: &str = "I'm sorry, but I'm having trouble connecting to my AI brain right now. Please try again in a moment.";

/// Clear reply used when the backend is unavailable
pub const CLEARED_TEXT: &str = "Conversation history cleared. Let's start fresh!";

/// Analyze error used when the backend is unavailable
pub const ANALYZE_UNAVAILABLE: &str =
    "Conversation analysis is unavailable right now. Please try again later.";

/// Liveness text of the health endpoint
pub const HEALTH_TEXT: &str = "Chat gateway is running";

/// Help reply used when the backend is unavailable
pub const HELP_TEXT: &str = "\
# How I can help

## Chat
Ask me anything in plain language. I remember our conversation until you clear it.

## Tools
- Dictionary: definitions, synonyms and examples
- Weather: current conditions and forecasts for any city
- Web search: recent news and general lookups
- Gmail: drafting and sending email
- Sheets: reading and updating spreadsheets

## Commands
- Clear: forget our conversation and start over
- Analyze: get a summary of what we have talked about
- Help: show this message

The assistant backend is currently unreachable, so answers may be limited.";

/// Tools advertised when the backend cannot list its own
pub const FALLBACK_TOOLS: &[(&str, &str)] = &[
    ("dictionary", "Word definitions, synonyms and examples"),
    ("weather", "Current weather and forecasts"),
    ("web_search", "Web search for recent information"),
    ("gmail", "Compose and send email"),
    ("sheets", "Read and update spreadsheets"),
];

/// Static tool list as JSON
pub fn fallback_tools() -> Value {
    Value::Array(
        FALLBACK_TOOLS
            .iter()
            .map(|(name, description)| json!({"name": name, "description": description}))
            .collect(),
    )
}

/// Error-wrapped text sent over a socket when the backend failed.
///
/// Only the error kind is exposed to the user; details stay in the logs.
pub fn socket_error_text(error: &BackendError) -> String {
    format!(
        "Sorry, I couldn't process your message ({}). Please try again later.",
        error.kind()
    )
}
