//! Filter criteria snapshots and the immutable query requests built from them.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("unknown filter key `{0}`")]
    UnknownKey(String),
}

/// Filter values keyed by a fixed, per-page set of filter names.
///
/// Values are trimmed; an empty value means "no filter on this dimension".
/// Equality is structural, so two snapshots holding the same values compare
/// equal whatever order they were filled in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    values: BTreeMap<String, String>,
}

impl FilterCriteria {
    /// Creates criteria accepting exactly `keys`, all unset.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: keys
                .into_iter()
                .map(|key| (key.into(), String::new()))
                .collect(),
        }
    }

    /// Sets `key` to `value`, returning whether the snapshot changed.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<bool, CriteriaError> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or_else(|| CriteriaError::UnknownKey(key.to_string()))?;
        let value = value.into().trim().to_string();
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    pub fn clear(&mut self, key: &str) -> Result<bool, CriteriaError> {
        self.set(key, "")
    }

    /// Returns the value for `key` when it is set to something non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over the filters that are actually in effect.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// True when no filter is in effect.
    pub fn is_unfiltered(&self) -> bool {
        self.active().next().is_none()
    }
}

/// One dispatched list query. `sequence` grows strictly per controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryRequest {
    pub criteria: FilterCriteria,
    pub page: usize,
    pub sequence: u64,
}
