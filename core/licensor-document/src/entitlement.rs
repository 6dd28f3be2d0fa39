//! Per-product entitlements carried inside a document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::{iso8601, Timestamp};

/// A single feature flag or quota value.
///
/// Floating-point numbers, arrays and objects are not valid feature values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl FeatureValue {
    /// Returns the flag value, or `None` if this is not a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the quota value, or `None` if this is not an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the text value, or `None` if this is not a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// An entitlement to one product for a bounded period.
///
/// Maps are ordered so serialization emits keys in a stable order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// Unique identifier of this entitlement.
    pub id: Uuid,
    /// The product this entitlement grants.
    pub product_id: Uuid,
    /// Free-form product metadata (plan name, tier, ...).
    #[serde(default)]
    pub product_metadata: BTreeMap<String, serde_json::Value>,
    /// Feature flags and quotas.
    #[serde(default)]
    pub features: BTreeMap<String, FeatureValue>,
    /// Per-consumer overrides applied on top of `features`.
    #[serde(default)]
    pub feature_overrides: BTreeMap<String, FeatureValue>,
    #[serde(with = "iso8601")]
    pub valid_from: Timestamp,
    #[serde(with = "iso8601")]
    pub valid_to: Timestamp,
    /// Whether the entitlement may float between devices.
    pub is_floatable: bool,
}

impl Entitlement {
    /// Returns the effective value of a feature, honoring overrides.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.feature_overrides
            .get(name)
            .or_else(|| self.features.get(name))
    }

    /// Returns true if `at` falls inside `[valid_from, valid_to]`.
    #[must_use]
    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        self.valid_from <= at && at <= self.valid_to
    }
}
