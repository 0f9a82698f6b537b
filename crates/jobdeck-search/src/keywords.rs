//! Keyword-containment rules for categorical descriptors.
//!
//! Upstream descriptors are free text with no shared vocabulary ("Fresher",
//! "0-1 yrs", "Permanent / Full-time"). A slot member matches when the
//! lower-cased descriptor contains any of that member's keywords. The rules
//! are deliberately loose: "mid" also hits "midnight shift", and "senior"
//! is found inside "non-senior". Those hits are accepted behavior.

use jobdeck_core::{EmploymentType, ExperienceLevel};

/// Keywords for each experience level.
pub fn experience_keywords(level: ExperienceLevel) -> &'static [&'static str] {
    match level {
        ExperienceLevel::Entry => &["entry", "fresher", "0-1", "0 to 1"],
        ExperienceLevel::Mid => &["mid", "2-5", "2 to 5"],
        ExperienceLevel::Senior => &["senior", "5+", "5+ years"],
    }
}

/// Keywords for each employment type.
pub fn employment_type_keywords(kind: EmploymentType) -> &'static [&'static str] {
    match kind {
        EmploymentType::FullTime => &["full", "permanent"],
        EmploymentType::PartTime => &["part"],
        EmploymentType::Contract => &["contract", "temporary"],
        EmploymentType::Internship => &["intern", "trainee"],
    }
}

/// True when the descriptor is present and contains any keyword.
pub fn contains_any(descriptor: Option<&str>, keywords: &[&str]) -> bool {
    let Some(descriptor) = descriptor else {
        return false;
    };
    let lowered = descriptor.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

pub fn experience_matches(descriptor: Option<&str>, level: ExperienceLevel) -> bool {
    contains_any(descriptor, experience_keywords(level))
}

pub fn employment_type_matches(descriptor: Option<&str>, kind: EmploymentType) -> bool {
    contains_any(descriptor, employment_type_keywords(kind))
}
