//! Serde adapters that store [`Uuid`] values as hyphenated strings.
//!
//! The driver serializes typed documents in non-human-readable mode, where
//! `Uuid` would otherwise become binary. Routing every id field through these
//! adapters keeps stored ids, filter values from [`super::uuid_bson`] and the
//! JSON wire format identical.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Brand {
//!     #[serde(rename = "_id", with = "database::mongodb::serde_uuid")]
//!     id: Uuid,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
use uuid::Uuid;

pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Uuid::parse_str(&raw).map_err(D::Error::custom)
}

/// `Option<Uuid>` variant; pair with `#[serde(default)]`
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Uuid>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .filter(|raw| !raw.is_empty())
            .map(|raw| Uuid::parse_str(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

/// `Vec<Uuid>` variant; pair with `#[serde(default)]`
pub mod vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(ids: &[Uuid], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Uuid>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|raw| Uuid::parse_str(raw).map_err(D::Error::custom))
            .collect()
    }
}
