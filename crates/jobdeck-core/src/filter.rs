//! Categorical filter slots for the listing view.
//!
//! A [`FilterSet`] has three independent slots. Each slot is either inactive
//! (`None`) or holds exactly one member of a fixed enumeration. Active slots
//! combine conjunctively; evaluation lives in `jobdeck-search`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{COMPENSATION_HIGH_MIN, COMPENSATION_LOW_MAX, COMPENSATION_MID_MAX};
use crate::error::Error;

// =============================================================================
// EXPERIENCE LEVEL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [Self::Entry, Self::Mid, Self::Senior];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior Level",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExperienceLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry level" | "entry" => Ok(Self::Entry),
            "mid level" | "mid" => Ok(Self::Mid),
            "senior level" | "senior" => Ok(Self::Senior),
            _ => Err(Error::InvalidInput(format!("unknown experience level: {}", s))),
        }
    }
}

// =============================================================================
// EMPLOYMENT TYPE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EmploymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "full time" => Ok(Self::FullTime),
            "part time" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            _ => Err(Error::InvalidInput(format!("unknown employment type: {}", s))),
        }
    }
}

// =============================================================================
// COMPENSATION RANGE
// =============================================================================

/// Compensation bucket. Bounds are inclusive, so adjacent buckets share
/// their boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompensationRange {
    #[serde(rename = "0-20000")]
    Below20k,
    #[serde(rename = "20000-50000")]
    From20kTo50k,
    #[serde(rename = "50000-100000")]
    From50kTo100k,
    #[serde(rename = "100000+")]
    Above100k,
}

impl CompensationRange {
    pub const ALL: [CompensationRange; 4] = [
        Self::Below20k,
        Self::From20kTo50k,
        Self::From50kTo100k,
        Self::Above100k,
    ];

    /// Inclusive lower bound.
    pub fn min(&self) -> u64 {
        match self {
            Self::Below20k => 0,
            Self::From20kTo50k => COMPENSATION_LOW_MAX,
            Self::From50kTo100k => COMPENSATION_MID_MAX,
            Self::Above100k => COMPENSATION_HIGH_MIN,
        }
    }

    /// Inclusive upper bound; `None` for the open-ended top bucket.
    pub fn max(&self) -> Option<u64> {
        match self {
            Self::Below20k => Some(COMPENSATION_LOW_MAX),
            Self::From20kTo50k => Some(COMPENSATION_MID_MAX),
            Self::From50kTo100k => Some(COMPENSATION_HIGH_MIN),
            Self::Above100k => None,
        }
    }

    pub fn contains(&self, amount: u64) -> bool {
        amount >= self.min() && self.max().map_or(true, |max| amount <= max)
    }

    /// Wire value, e.g. `"20000-50000"`.
    pub fn value(&self) -> &'static str {
        match self {
            Self::Below20k => "0-20000",
            Self::From20kTo50k => "20000-50000",
            Self::From50kTo100k => "50000-100000",
            Self::Above100k => "100000+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Below20k => "Below ₹20,000",
            Self::From20kTo50k => "₹20,000 - ₹50,000",
            Self::From50kTo100k => "₹50,000 - ₹100,000",
            Self::Above100k => "Above ₹100,000",
        }
    }
}

impl fmt::Display for CompensationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CompensationRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.value() == wanted || r.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidInput(format!("unknown compensation range: {}", s)))
    }
}

// =============================================================================
// FILTER SET
// =============================================================================

/// One selectable option in any slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChoice {
    Experience(ExperienceLevel),
    EmploymentType(EmploymentType),
    Compensation(CompensationRange),
}

/// The active categorical filters. All slots inactive means "no constraint".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation_range: Option<CompensationRange>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_experience(mut self, level: ExperienceLevel) -> Self {
        self.experience = Some(level);
        self
    }

    pub fn with_employment_type(mut self, kind: EmploymentType) -> Self {
        self.employment_type = Some(kind);
        self
    }

    pub fn with_compensation_range(mut self, range: CompensationRange) -> Self {
        self.compensation_range = Some(range);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn active_count(&self) -> usize {
        usize::from(self.experience.is_some())
            + usize::from(self.employment_type.is_some())
            + usize::from(self.compensation_range.is_some())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select `choice` in its slot, or clear the slot if `choice` is already
    /// the active option there.
    pub fn toggle(&mut self, choice: FilterChoice) {
        match choice {
            FilterChoice::Experience(v) => toggle_slot(&mut self.experience, v),
            FilterChoice::EmploymentType(v) => toggle_slot(&mut self.employment_type, v),
            FilterChoice::Compensation(v) => toggle_slot(&mut self.compensation_range, v),
        }
    }
}

fn toggle_slot<T: PartialEq>(slot: &mut Option<T>, value: T) {
    if slot.as_ref() == Some(&value) {
        *slot = None;
    } else {
        *slot = Some(value);
    }
}
