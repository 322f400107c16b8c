use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::schema::RequirementKey;
use super::value::RequirementValue;
use super::RequirementsError;

/// Enabled requirements of one job posting, keyed by requirement.
///
/// Absent keys mean "not a criterion for this job". The document has no
/// identity of its own; it travels as the `requisitos_json` string of its
/// posting and is replaced as a whole on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRequirementsDocument {
    entries: BTreeMap<RequirementKey, RequirementValue>,
}

impl JobRequirementsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, returning the previous value.
    pub fn insert(
        &mut self,
        key: RequirementKey,
        value: RequirementValue,
    ) -> Result<Option<RequirementValue>, RequirementsError> {
        let shape = key.shape();
        if !shape.accepts(&value) {
            return Err(RequirementsError::ShapeMismatch {
                key,
                expected: shape.label(),
            });
        }
        Ok(self.entries.insert(key, value))
    }

    pub fn get(&self, key: RequirementKey) -> Option<&RequirementValue> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: RequirementKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn remove(&mut self, key: RequirementKey) -> Option<RequirementValue> {
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = RequirementKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RequirementKey, &RequirementValue)> {
        self.entries.iter().map(|(key, value)| (*key, value))
    }

    pub fn to_json_string(&self) -> Result<String, RequirementsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RequirementsError> {
        let RawEntries(entries) = serde_json::from_str(raw)?;
        Self::from_raw_entries(entries)
    }

    fn from_raw_entries(
        entries: Vec<(String, serde_json::Value)>,
    ) -> Result<Self, RequirementsError> {
        let mut document = Self::new();
        for (raw_key, raw_value) in entries {
            let key = RequirementKey::parse(&raw_key)
                .ok_or_else(|| RequirementsError::UnknownKey(raw_key.clone()))?;
            if document.entries.contains_key(&key) {
                return Err(RequirementsError::DuplicateKey(raw_key));
            }
            let value = RequirementValue::from_json(key, raw_value)?;
            document.entries.insert(key, value);
        }
        Ok(document)
    }
}

/// Top-level members in source order, repeats included.
struct RawEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a requirements object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl Serialize for JobRequirementsDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for JobRequirementsDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let RawEntries(entries) = RawEntries::deserialize(deserializer)?;
        Self::from_raw_entries(entries).map_err(de::Error::custom)
    }
}
