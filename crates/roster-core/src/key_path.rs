//! Nested key resolution
//!
//! Turns a record plus a dotted [`KeyPath`] into the [`GroupKey`] it is
//! bucketed under. Resolution is total: a missing attribute yields the
//! [`UNDEFINED_KEY`] sentinel instead of an error.

use crate::error::{CoreResult, GroupingError};
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Key produced for records lacking an attribute on the path
pub const UNDEFINED_KEY: &str = "undefined";

/// Dot-separated attribute path, e.g. `dob.age` or `nat`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path
    ///
    /// # Errors
    /// `GroupingError::EmptyKeyPath` when `raw` is empty.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        if raw.is_empty() {
            return Err(GroupingError::EmptyKeyPath);
        }
        Ok(Self {
            raw: raw.to_string(),
            segments: raw.split('.').map(str::to_string).collect(),
        })
    }

    /// Path from a known non-empty literal
    pub(crate) fn from_literal(raw: &'static str) -> Self {
        debug_assert!(!raw.is_empty());
        Self {
            raw: raw.to_string(),
            segments: raw.split('.').map(str::to_string).collect(),
        }
    }

    /// Original path text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Path segments in walk order
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Paths mentioning `name` bucket by leading letter
    #[inline]
    #[must_use]
    pub fn is_name_like(&self) -> bool {
        self.raw.contains("name")
    }
}

impl FromStr for KeyPath {
    type Err = GroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = GroupingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.raw
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Bucket label derived from a record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    /// Create key from text
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The `"undefined"` bucket
    #[inline]
    #[must_use]
    pub fn undefined() -> Self {
        Self(UNDEFINED_KEY.to_string())
    }

    /// Key text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the missing-attribute bucket
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.0 == UNDEFINED_KEY
    }
}

impl Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the group key of `record` under `path`
///
/// Walks object attributes segment by segment. Absent segments, or walking
/// into a non-object, produce the undefined sentinel. For name-like paths
/// the leaf is reduced to its first character, upper-cased.
#[must_use]
pub fn resolve_key(record: &Record, path: &KeyPath) -> GroupKey {
    let leaf = path
        .segments()
        .iter()
        .try_fold(record.value(), |node, segment| node.as_object()?.get(segment));

    let Some(leaf) = leaf else {
        return GroupKey::undefined();
    };

    let text = stringify(leaf);
    if path.is_name_like() {
        GroupKey(leading_upper(&text))
    } else {
        GroupKey(text)
    }
}

/// Count records that share `record`'s key under `path`
#[must_use]
pub fn count_matching(records: &[Record], record: &Record, path: &KeyPath) -> usize {
    let key = resolve_key(record, path);
    records
        .iter()
        .filter(|other| resolve_key(other, path) == key)
        .count()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn leading_upper(text: &str) -> String {
    text.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
