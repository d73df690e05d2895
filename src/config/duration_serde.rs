//! Durations in config files: `"10h"`, `"1h30m"` or a bare number of seconds

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

/// `#[serde(with = "duration")]` helpers backed by humantime
pub mod duration {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(secs) => return Ok(Duration::from_secs(secs)),
            RawDuration::Text(text) => text,
        };
        humantime::parse_duration(text.trim())
            .map_err(|e| serde::de::Error::custom(format!("invalid duration {text:?}: {e}")))
    }
}

/// Parse one of the string constants in `defaults.rs`
pub(crate) fn parse_default(value: &str) -> Duration {
    humantime::parse_duration(value).unwrap_or_default()
}
