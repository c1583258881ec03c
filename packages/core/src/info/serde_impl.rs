//! Serde integration: an [`InfoMap`] serializes as a map in insertion
//! order and deserializes the same way, so attribute maps round-trip
//! through configuration files.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::info::{legal_key, legal_value, InfoMap};

impl Serialize for InfoMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_null() {
            return Err(serde::ser::Error::custom("cannot serialize the null info map"));
        }
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key, &value)?;
        }
        map.end()
    }
}

struct InfoMapVisitor;

impl<'de> Visitor<'de> for InfoMapVisitor {
    type Value = InfoMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of non-empty string keys to non-empty string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<InfoMap, A::Error> {
        let mut map = InfoMap::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            if !legal_key(&key) {
                return Err(serde::de::Error::custom(format!(
                    "illegal info key of length {}",
                    key.len()
                )));
            }
            if !legal_value(&value) {
                return Err(serde::de::Error::custom(format!(
                    "illegal info value of length {} under key '{}'",
                    value.len(),
                    key
                )));
            }
            map.insert_or_assign(&key, &value);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for InfoMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<InfoMap, D::Error> {
        deserializer.deserialize_map(InfoMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info_map;

    #[test]
    fn serializes_in_insertion_order() {
        let m = info_map! { "b" => "2", "a" => "1" };
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"b":"2","a":"1"}"#);
    }

    #[test]
    fn round_trips() {
        let m = info_map! { "host" => "node0", "wdir" => "/tmp" };
        let json = serde_json::to_string(&m).unwrap();
        let back: InfoMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.keys(), m.keys());
    }

    #[test]
    fn null_map_does_not_serialize() {
        assert!(serde_json::to_string(&InfoMap::null()).is_err());
    }

    #[test]
    fn illegal_entries_fail_deserialization() {
        assert!(serde_json::from_str::<InfoMap>(r#"{"": "v"}"#).is_err());
        assert!(serde_json::from_str::<InfoMap>(r#"{"k": ""}"#).is_err());
    }
}
