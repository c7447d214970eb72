// Dweve Perfsuite - Benchmark Suite Inspection Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ordered metadata mappings and metadata reconciliation.
//!
//! Metadata is attached to suites, benchmarks and runs. Keys keep their
//! insertion order so that reconciliation and display are deterministic.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single metadata value: a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Free-form string
    Str(String),
}

impl MetadataValue {
    /// Parse a user supplied value, preferring integers, then floats.
    ///
    /// `nan` and `inf` stay strings: JSON has no encoding for them.
    pub fn parse(text: &str) -> Self {
        if let Ok(n) = text.parse::<i64>() {
            return MetadataValue::Int(n);
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => MetadataValue::Float(f),
            _ => MetadataValue::Str(text.to_string()),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(n) => Some(*n as f64),
            MetadataValue::Float(f) => Some(*f),
            MetadataValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Int(n) => write!(f, "{}", n),
            MetadataValue::Float(v) => write!(f, "{}", v),
            MetadataValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Str(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Str(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::Int(n)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

/// Insertion-ordered mapping from metadata keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value. A replaced key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &MetadataValue) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Copy every entry of `other` into `self`, overriding existing keys.
    pub fn extend_from(&mut self, other: &Metadata) {
        for (key, value) in other.iter() {
            self.insert(key, value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<MetadataValue>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = Metadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metadata keys to strings or numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Metadata, A::Error> {
                let mut metadata = Metadata::new();
                while let Some((key, value)) = access.next_entry::<String, MetadataValue>()? {
                    metadata.insert(key, value);
                }
                Ok(metadata)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// Key-value pairs present with an identical value in every mapping.
///
/// Entries come out in the order of the first mapping. Fewer than two
/// mappings yield an empty result: there is nothing to reconcile.
pub fn common_metadata(mappings: &[Metadata]) -> Metadata {
    let Some((first, rest)) = mappings.split_first() else {
        return Metadata::new();
    };
    if rest.is_empty() {
        return Metadata::new();
    }

    first
        .iter()
        .filter(|(key, value)| rest.iter().all(|other| other.get(key) == Some(*value)))
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, i64)]) -> Metadata {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_common_metadata_keeps_identical_pairs() {
        let common = common_metadata(&[meta(&[("a", 1), ("b", 2)]), meta(&[("a", 1), ("b", 3)])]);
        assert_eq!(common, meta(&[("a", 1)]));
    }

    #[test]
    fn test_common_metadata_single_input_is_empty() {
        assert!(common_metadata(&[meta(&[("a", 1)])]).is_empty());
        assert!(common_metadata(&[]).is_empty());
    }

    #[test]
    fn test_common_metadata_requires_key_everywhere() {
        let common = common_metadata(&[
            meta(&[("a", 1), ("b", 2)]),
            meta(&[("b", 2)]),
            meta(&[("a", 1), ("b", 2)]),
        ]);
        assert_eq!(common, meta(&[("b", 2)]));
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(MetadataValue::parse("16"), MetadataValue::Int(16));
        assert_eq!(MetadataValue::parse("0.5"), MetadataValue::Float(0.5));
        assert_eq!(MetadataValue::parse("x86"), MetadataValue::from("x86"));
        for text in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert_eq!(MetadataValue::parse(text), MetadataValue::from(text));
        }
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut m = meta(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(m.insert("b", 20i64), Some(MetadataValue::Int(2)));
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(m.get("b"), Some(&MetadataValue::Int(20)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut m = meta(&[("a", 1), ("b", 2), ("c", 3)]);
        m.remove("a");
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["b", "c"]);
        assert!(m.remove("missing").is_none());
    }

    #[test]
    fn test_json_preserves_insertion_order() {
        let m: Metadata = serde_json::from_str(r#"{"z": 1, "a": "x", "m": 1.5}"#).unwrap();
        let keys: Vec<_> = m.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(m.get("a"), Some(&MetadataValue::Str("x".to_string())));
        assert_eq!(m.get("m"), Some(&MetadataValue::Float(1.5)));
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"z":1,"a":"x","m":1.5}"#
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(MetadataValue::parse("12"), MetadataValue::Int(12));
        assert_eq!(MetadataValue::parse("1.25"), MetadataValue::Float(1.25));
        assert_eq!(
            MetadataValue::parse("cpython"),
            MetadataValue::Str("cpython".to_string())
        );
    }
}
