use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Prefix the Codex shell prepends to the user's original request inside a
/// `user_message` event. Everything after it is the session's display summary.
pub const REQUEST_MARKER: &str = "My request for Codex:";

#[derive(Debug, Error)]
pub enum ParseRecordsError {
    #[error("line {line}: invalid json: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// One decoded line of a session log. Only the user-message shape is
/// recognized; every other valid JSON line is carried opaquely.
#[derive(Clone, Debug, PartialEq)]
pub enum EventRecord {
    UserMessage { message: String },
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct EventLine {
    #[serde(rename = "type")]
    line_type: Option<String>,
    payload: Option<EventPayload>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    #[serde(rename = "type")]
    payload_type: Option<String>,
    message: Option<Value>,
}

impl EventRecord {
    fn from_value(value: Value) -> Self {
        let Ok(line) = serde_json::from_value::<EventLine>(value.clone()) else {
            return Self::Other(value);
        };
        if line.line_type.as_deref() == Some("event_msg") {
            if let Some(payload) = line.payload {
                if payload.payload_type.as_deref() == Some("user_message") {
                    // `message` must be a string; any other shape is opaque.
                    if let Some(message) = payload.message.as_ref().and_then(Value::as_str) {
                        return Self::UserMessage {
                            message: message.to_string(),
                        };
                    }
                }
            }
        }
        Self::Other(value)
    }
}

/// Parses a whole session file as line-delimited JSON, preserving line order
/// and skipping blank lines. Strict: one bad line fails the whole file.
pub fn parse_records(content: &str) -> Result<Vec<EventRecord>, ParseRecordsError> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|source| {
            ParseRecordsError::MalformedRecord {
                line: idx.saturating_add(1),
                source,
            }
        })?;
        records.push(EventRecord::from_value(value));
    }
    Ok(records)
}

/// Scans records in order for the first user message carrying the request
/// marker and returns the trimmed text after it. An empty remainder is a
/// valid summary; `fallback` is used only when no record matches.
pub fn extract_summary(records: &[EventRecord], fallback: &str) -> String {
    for record in records {
        let EventRecord::UserMessage { message } = record else {
            continue;
        };
        if let Some(idx) = message.find(REQUEST_MARKER) {
            return message[idx + REQUEST_MARKER.len()..].trim().to_string();
        }
    }
    fallback.to_string()
}
