use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    ClaimResult, Claims, AUDIENCE, EXPIRATION_TIME, ISSUED_AT, ISSUER, KEY_ID, NOT_BEFORE, SUBJECT,
};
use crate::error::ClaimError;

/// An open map of claims
///
/// The well-known keys (`kid`, `exp`, `iat`, `nbf`, `iss`, `sub`, `aud`) are
/// interpreted by convention; any other key is carried untouched. Typed
/// lookups report a present value of the wrong shape as
/// [`ClaimError::WrongType`] instead of silently treating it as absent. A
/// `null` value counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsMap(BTreeMap<String, Value>);

impl ClaimsMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a claim and return the map, for building claims inline
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a claim, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a claim
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Raw value of a claim
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of present (non-`null`) claims
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Present claims in key order; `null` values are skipped like in [`get`](Self::get)
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter().filter(|(_, v)| !v.is_null())
    }

    /// String claim
    pub fn get_str(&self, key: &str) -> ClaimResult<&str> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(wrong_type(key, "string")),
        }
    }

    /// Integer timestamp claim (Unix seconds)
    pub fn get_time(&self, key: &str) -> ClaimResult<i64> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| wrong_type(key, "integer timestamp")),
        }
    }

    /// List of strings claim; a single string is read as a one-element list
    pub fn get_strings(&self, key: &str) -> ClaimResult<Vec<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(vec![s.as_str()])),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(|| wrong_type(key, "list of strings")))
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(wrong_type(key, "list of strings")),
        }
    }

    /// Claim deserialized into an arbitrary type
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ClaimResult<T> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|_| wrong_type(key, std::any::type_name::<T>())),
        }
    }
}

fn wrong_type(key: &str, expected: &'static str) -> ClaimError {
    ClaimError::WrongType {
        claim: key.to_string(),
        expected,
    }
}

impl Claims for ClaimsMap {
    fn key_id(&self) -> ClaimResult<&str> {
        self.get_str(KEY_ID)
    }

    fn expiration_time(&self) -> ClaimResult<i64> {
        self.get_time(EXPIRATION_TIME)
    }

    fn issued_at(&self) -> ClaimResult<i64> {
        self.get_time(ISSUED_AT)
    }

    fn not_before(&self) -> ClaimResult<i64> {
        self.get_time(NOT_BEFORE)
    }

    fn issuer(&self) -> ClaimResult<&str> {
        self.get_str(ISSUER)
    }

    fn subject(&self) -> ClaimResult<&str> {
        self.get_str(SUBJECT)
    }

    fn audience(&self) -> ClaimResult<Vec<&str>> {
        self.get_strings(AUDIENCE)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ClaimsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for ClaimsMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<BTreeMap<String, Value>> for ClaimsMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}
