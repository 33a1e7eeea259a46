//! Grouping categories offered to the user

use crate::error::{CoreResult, GroupingError};
use crate::key_path::KeyPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selectable grouping category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// First letter of the first name
    #[default]
    #[serde(rename = "firstname")]
    FirstName,
    /// Age in years
    #[serde(rename = "dob.age")]
    Age,
    /// Gender
    #[serde(rename = "gender")]
    Gender,
    /// Nationality code
    #[serde(rename = "nat")]
    Nationality,
}

impl Category {
    /// Every category, in menu order
    pub const ALL: [Self; 4] = [Self::FirstName, Self::Age, Self::Gender, Self::Nationality];

    /// Attribute path the category groups by
    #[inline]
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            Self::FirstName => "firstname",
            Self::Age => "dob.age",
            Self::Gender => "gender",
            Self::Nationality => "nat",
        }
    }

    /// Menu label
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "Alphabetically",
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Nationality => "Nationality",
        }
    }

    /// Parsed key path
    #[must_use]
    pub fn key_path(self) -> KeyPath {
        KeyPath::from_literal(self.value())
    }
}

impl FromStr for Category {
    type Err = GroupingError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.value() == s)
            .ok_or_else(|| GroupingError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Label/value pair for a category selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    /// Display label
    pub label: &'static str,
    /// Category value (key path)
    pub value: &'static str,
}

/// Options for a category selector, in menu order
#[must_use]
pub fn category_options() -> Vec<CategoryOption> {
    Category::ALL
        .into_iter()
        .map(|c| CategoryOption {
            label: c.label(),
            value: c.value(),
        })
        .collect()
}
