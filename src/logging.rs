//! One JSON object per line: `level`, `event`, `message`, `timestamp_ms` and
//! optional `metadata`. Errors go to stderr, everything else to stdout.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

#[derive(Serialize)]
struct LogEvent<'a> {
    level: Level,
    event: &'a str,
    message: &'a str,
    timestamp_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

fn emit(level: Level, event: &str, message: &str, metadata: Option<Value>) {
    match render_line(level, event, message, metadata) {
        Ok(line) if level == Level::Error => eprintln!("{line}"),
        Ok(line) => println!("{line}"),
        Err(err) => eprintln!(
            "{{\"level\":\"error\",\"event\":\"logging.failure\",\"message\":\"failed to serialise log\",\"error\":\"{err}\"}}"
        ),
    }
}

fn render_line(
    level: Level,
    event: &str,
    message: &str,
    metadata: Option<Value>,
) -> serde_json::Result<String> {
    serde_json::to_string(&LogEvent {
        level,
        event,
        message,
        timestamp_ms: current_timestamp_ms(),
        metadata,
    })
}

pub fn info(event: &str, message: &str, metadata: Value) {
    emit(Level::Info, event, message, Some(metadata));
}

pub fn warn(event: &str, message: &str, metadata: Value) {
    emit(Level::Warn, event, message, Some(metadata));
}

pub fn error(event: &str, message: &str, metadata: Value) {
    emit(Level::Error, event, message, Some(metadata));
}

pub fn info_simple(event: &str, message: &str) {
    emit(Level::Info, event, message, None);
}

pub fn warn_simple(event: &str, message: &str) {
    emit(Level::Warn, event, message, None);
}

fn current_timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn line_carries_level_and_metadata() {
        let line = render_line(
            Level::Warn,
            "refresh.failed",
            "Ticker refresh failed",
            Some(json!({ "kind": "network" })),
        )
        .expect("serialise");
        let parsed: Value = serde_json::from_str(&line).expect("json line");

        assert_eq!(parsed["level"], "warn");
        assert_eq!(parsed["event"], "refresh.failed");
        assert_eq!(parsed["metadata"]["kind"], "network");
        assert!(parsed["timestamp_ms"].as_u64().is_some());
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let line = render_line(Level::Info, "server.stop", "stopped", None).expect("serialise");
        assert!(!line.contains("metadata"));
    }
}
