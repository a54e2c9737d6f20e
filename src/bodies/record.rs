//! # Body parameter records
//!
//! A [`BodyRecord`] is the raw, loader-agnostic description of one body: a flat map
//! from short field codes (`a`, `e`, `inc`, `omega`, `orbiting`, …) to their textual
//! values, exactly as read from a catalog row. Angles are given in degrees.
//!
//! Records never fail to load. A missing field or an empty value falls back to the
//! documented default of that field; a value that does not parse as a number is
//! logged and replaced by the default as well.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use crate::constants::{Radian, RADEG};

/// Raw parameters of a body, keyed by field code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyRecord {
    fields: AHashMap<String, String>,
}

impl BodyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, handy for hand-written catalogs.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.fields.insert(key.to_string(), value.to_string());
    }

    /// Trimmed value of a field; empty values count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Numeric value of a field. Unparseable values are reported and treated as missing.
    pub fn number(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        match f64::from_str(raw) {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!(
                    body = self.get("name").unwrap_or("Unnamed"),
                    field = key,
                    value = raw,
                    "unparseable numeric field, using default"
                );
                None
            }
        }
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    /// Angle field given in degrees, returned in radians.
    pub fn angle_or(&self, key: &str, default_deg: f64) -> Radian {
        self.number_or(key, default_deg) * RADEG
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for BodyRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        BodyRecord {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
