// Typed field selectors used for grouping and summarizing records

use crate::record::{SleepRecord, UNKNOWN};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// One component of a group key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Score(u8),
    Label(String),
}

impl GroupKey {
    pub fn label(name: impl Into<String>) -> Self {
        GroupKey::Label(name.into())
    }

    pub fn as_score(&self) -> Option<u8> {
        match self {
            GroupKey::Score(s) => Some(*s),
            GroupKey::Label(_) => None,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Score(s) => write!(f, "{}", s),
            GroupKey::Label(l) => f.write_str(l),
        }
    }
}

/// Categorical dimension a record can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Quality,
    Stress,
    Gender,
    Occupation,
    BmiCategory,
    Disorder,
    /// Every record maps to the same key; collapses a grouping to one group.
    Constant(&'static str),
}

impl Dimension {
    /// Key of `record` along this dimension. `None` means the record has no
    /// usable value and belongs to no group for this dimension.
    pub fn key(&self, record: &SleepRecord) -> Option<GroupKey> {
        match self {
            Dimension::Quality => record.quality.map(GroupKey::Score),
            Dimension::Stress => record.stress.map(GroupKey::Score),
            Dimension::Gender => Some(GroupKey::label(
                record.gender.as_deref().unwrap_or(UNKNOWN),
            )),
            Dimension::Occupation => Some(GroupKey::label(record.occupation.as_str())),
            Dimension::BmiCategory => Some(GroupKey::label(record.bmi.label())),
            Dimension::Disorder => Some(GroupKey::label(record.disorder.label())),
            Dimension::Constant(name) => Some(GroupKey::label(*name)),
        }
    }
}

/// Numeric field a group can be summarized by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    SleepDuration,
    Quality,
    Stress,
}

impl Measure {
    pub fn value(&self, record: &SleepRecord) -> Option<f64> {
        match self {
            Measure::SleepDuration => record.sleep_duration,
            Measure::Quality => record.quality.map(f64::from),
            Measure::Stress => record.stress.map(f64::from),
        }
    }
}

/// Fixed score axis, e.g. 1..=10.
pub fn score_domain(range: RangeInclusive<u8>) -> Vec<GroupKey> {
    range.map(GroupKey::Score).collect()
}
