use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cookies and nonce obtained from one successful login
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// `name=value` pairs joined with `"; "`, ready for a `Cookie` header
    pub cookies: String,
    pub nonce: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl Session {
    /// Timestamped now, at the whole-second precision the file store keeps
    pub fn new(cookies: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
            nonce: nonce.into(),
            timestamp: Utc::now().trunc_subsecs(0),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Time elapsed since login, zero if the clock went backwards
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp).to_std().unwrap_or_default()
    }

    /// A session is reusable only while strictly younger than `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

// Cookies and nonce are credentials; keep them out of debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("cookies", &format_args!("<{} bytes>", self.cookies.len()))
            .field("nonce", &"****")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    const TEN_HOURS: Duration = Duration::from_secs(10 * 60 * 60);

    #[test]
    fn test_new_session_is_fresh() {
        let session = Session::new("wordpress_logged_in=abc", "abc1234567");
        assert!(session.is_fresh(TEN_HOURS));
    }

    #[test]
    fn test_eleven_hour_old_session_is_stale() {
        let session = Session::new("a=b", "abc1234567")
            .with_timestamp(Utc::now() - ChronoDuration::hours(11));
        assert!(!session.is_fresh(TEN_HOURS));
    }

    #[test]
    fn test_timestamp_serializes_as_epoch_seconds() {
        let timestamp = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let session = Session::new("a=b", "abc1234567").with_timestamp(timestamp);
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000);

        let restored: Session = serde_json::from_value(json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_new_session_survives_serialization_unchanged() {
        let session = Session::new("a=b", "abc1234567");
        assert_eq!(session.timestamp.timestamp_subsec_nanos(), 0);

        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_debug_hides_credentials() {
        let session = Session::new("wordpress_sec=topsecret", "abc1234567");
        let debug = format!("{session:?}");
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("abc1234567"));
    }
}
