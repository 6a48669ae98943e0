use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref UNSAFE_NOTE_ID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
}

/// Derives a note id from a vulnerability id by stripping every character
/// that is unsafe inside a resource name path segment. Distinct ids that
/// collapse to the same note id merge under one note.
pub fn note_id(short_description: &str) -> String {
    UNSAFE_NOTE_ID_CHARS
        .replace_all(short_description, "")
        .into_owned()
}

/// Coerces a CVSS score of unknown json representation to f32. Scanners have
/// emitted these as floats, integers and strings; anything else counts as 0.
pub fn to_score(value: Option<&Value>) -> f32 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) as f32,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parses an RFC 3339 timestamp, falling back to the unix epoch for absent or
/// malformed input.
pub fn to_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::*;
    use serde_json::json;

    #[test]
    fn test_note_id_passthrough() {
        assert_eq!(note_id("CVE-2021-1234"), "CVE-2021-1234");
        assert_eq!(note_id("GHSA-jfh8-c2jp-5v3q"), "GHSA-jfh8-c2jp-5v3q");
    }

    #[test]
    fn test_note_id_strips_unsafe_chars() {
        assert_eq!(note_id("CVE-2021-1234 (deb)"), "CVE-2021-1234deb");
        assert_eq!(note_id("TEMP-0000000-A0C94F/1"), "TEMP-0000000-A0C94F1");
        assert_eq!(note_id("a:b/c d#e"), "abcde");
    }

    #[test]
    fn test_to_score() {
        assert_eq!(to_score(Some(&json!(7.5))), 7.5);
        assert_eq!(to_score(Some(&json!(9))), 9.0);
        assert_eq!(to_score(Some(&json!("4.3"))), 4.3);
        assert_eq!(to_score(Some(&json!("not a number"))), 0.0);
        assert_eq!(to_score(Some(&json!(null))), 0.0);
        assert_eq!(to_score(None), 0.0);
    }

    #[test]
    fn test_to_timestamp() -> Result<()> {
        let ts = to_timestamp(Some("2021-07-30T11:15:00Z"));
        assert_eq!(ts.to_rfc3339(), "2021-07-30T11:15:00+00:00");

        let ts = to_timestamp(Some("2021-07-30T13:15:00+02:00"));
        assert_eq!(ts.to_rfc3339(), "2021-07-30T11:15:00+00:00");

        assert_eq!(to_timestamp(Some("yesterday")), DateTime::UNIX_EPOCH);
        assert_eq!(to_timestamp(None), DateTime::UNIX_EPOCH);

        Ok(())
    }
}
