//! Core types used throughout Cinelog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Scalar value of a search parameter
///
/// Stored untagged so the persisted document carries plain JSON scalars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl ParamValue {
    /// Borrow the string payload, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the integer payload, if this is an integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

// Floats compare by bit pattern so values can serve as grouping keys.
impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for ParamValue {}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// Normalized search parameters
///
/// Backed by a `BTreeMap`, so keys are always held in ascending
/// lexicographic order. That order is the canonical field order of a
/// stored event and the order used when rendering parameter values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchParams(BTreeMap<String, ParamValue>);

impl SearchParams {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in stored (ascending) order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Values in stored (ascending key) order
    pub fn values(&self) -> impl Iterator<Item = &ParamValue> {
        self.0.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Values joined with `", "` in ascending key order, keys dropped
    pub fn display_values(&self) -> String {
        self.values()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(crate) fn insert(&mut self, key: String, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(key, value)
    }
}

/// The fixed vocabulary of search types issued by the catalog search service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Title,
    GenreAndYears,
    Actor,
    Genre,
    Years,
}

impl SearchKind {
    pub const ALL: [SearchKind; 5] = [
        SearchKind::Title,
        SearchKind::GenreAndYears,
        SearchKind::Actor,
        SearchKind::Genre,
        SearchKind::Years,
    ];

    /// The normalized `search_type` string stored in the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "by title",
            Self::GenreAndYears => "by genre and years",
            Self::Actor => "by actor",
            Self::Genre => "by genre",
            Self::Years => "by years",
        }
    }

    /// Look up a kind by its stored `search_type` string
    pub fn from_search_type(search_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == search_type)
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded catalog search
///
/// Immutable once written. `timestamp` is assigned by the recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEvent {
    pub id: Uuid,
    pub search_type: String,
    pub parameters: SearchParams,
    pub result_count: u64,
    pub timestamp: DateTime<Utc>,
}

impl SearchEvent {
    /// Build an event from already-normalized parts
    pub fn new(
        search_type: impl Into<String>,
        parameters: SearchParams,
        result_count: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            search_type: search_type.into(),
            parameters,
            result_count,
            timestamp,
        }
    }
}
