//! Compensation descriptor parsing.
//!
//! Descriptors look like "₹25,000 per month", "15000", or "Negotiable".
//! Parsing discards every non-digit character and reads what remains as one
//! number. Missing or digit-free descriptors parse as 0.
//!
//! Ranges collapse: "₹15,000 - ₹20,000" becomes 1500020000 and lands in the
//! open-ended top bucket. Digit runs too long for `u64` saturate to
//! `u64::MAX`, which keeps the same bucket outcome.

use once_cell::sync::Lazy;
use regex::Regex;

use jobdeck_core::CompensationRange;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());

/// Parse a compensation descriptor into a single amount.
pub fn parse_compensation(descriptor: Option<&str>) -> u64 {
    let Some(descriptor) = descriptor else {
        return 0;
    };
    let digits = NON_DIGITS.replace_all(descriptor, "");
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// True when the parsed descriptor falls inside `range`.
pub fn compensation_matches(descriptor: Option<&str>, range: CompensationRange) -> bool {
    range.contains(parse_compensation(descriptor))
}
