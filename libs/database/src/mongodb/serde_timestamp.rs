//! Serde adapter that stores [`DateTime<Utc>`] as fixed-width RFC 3339 strings.
//!
//! Every value is rendered in UTC with exactly three fractional digits
//! (`2026-10-18T09:30:00.120Z`), so comparing or sorting the stored strings
//! orders them by instant. chrono's default output trims trailing zeros and
//! would not.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Brand {
//!     #[serde(with = "database::mongodb::serde_timestamp")]
//!     created_at: DateTime<Utc>,
//! }
//! ```

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

/// Current time at the stored precision, so a value survives a round trip unchanged
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// The stored form of `at`
pub fn timestamp_string(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse any RFC 3339 timestamp and re-render it in the stored form
pub fn normalize(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| timestamp_string(&at.with_timezone(&Utc)))
}

pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp_string(at))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(D::Error::custom)
}
