//! Record id (de)serialization.
//!
//! Ids arrive as `_id`, as `id`, or as both. Used as
//! `#[serde(flatten, with = "crate::record_id")]` so both keys reach the
//! field; `_id` wins when both are present. Ids are always written as `id`.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
struct WireIds {
    #[serde(rename = "_id")]
    underscore: Option<String>,
    id: Option<String>,
}

impl WireIds {
    fn pick(self) -> Option<String> {
        self.underscore.or(self.id)
    }
}

pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry("id", id)?;
    map.end()
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    WireIds::deserialize(deserializer)?
        .pick()
        .ok_or_else(|| serde::de::Error::missing_field("id"))
}

/// Same as the parent module, for records whose id is optional.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = id {
            map.serialize_entry("id", id)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(WireIds::deserialize(deserializer)?.pick())
    }
}
