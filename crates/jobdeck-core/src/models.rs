//! Record model shared by every jobdeck crate.
//!
//! A [`Record`] is an immutable snapshot of one job listing as delivered by a
//! Page Source. Upstream payloads are loosely typed, so deserialization is
//! lenient: any descriptive field may be absent, null, empty, or a bare
//! number, and none of those cases is an error. Only the identifier is
//! required.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

// =============================================================================
// RECORD ID
// =============================================================================

/// Identifier of a record, unique within one loaded session.
///
/// Sources emit either strings or integers; both normalize to the same
/// textual form, so `42` and `"42"` name the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Unsigned(n) => n.to_string(),
            RawId::Signed(n) => n.to_string(),
        };
        if id.is_empty() {
            return Err(serde::de::Error::custom("record id cannot be empty"));
        }
        Ok(Self(id))
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// Preferred call window published with a listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPreference {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_call_start_time: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_call_end_time: Option<String>,
}

/// One job listing as returned by the Page Source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Organization name.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Compensation descriptor; free text such as "₹25,000 per month".
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,

    /// Experience descriptor; free text such as "2-5 years".
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    /// Employment-type descriptor.
    #[serde(
        rename = "jobType",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,

    #[serde(
        rename = "job_category",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    #[serde(
        rename = "job_role",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub vacancies: Option<u32>,

    #[serde(
        rename = "createdOn",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shift_timing: Option<String>,

    #[serde(default, deserialize_with = "lenient_tags", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient_contact",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_preference: Option<ContactPreference>,

    /// Fields this model does not name, kept so stored snapshots round-trip.
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, JsonValue>,
}

impl Record {
    /// Create a record carrying only an identifier.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            company: None,
            location: None,
            salary: None,
            experience: None,
            job_type: None,
            qualification: None,
            category: None,
            role: None,
            vacancies: None,
            created_on: None,
            image: None,
            phone: None,
            description: None,
            requirements: None,
            shift_timing: None,
            tags: Vec::new(),
            contact_preference: None,
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_salary(mut self, salary: impl Into<String>) -> Self {
        self.salary = Some(salary.into());
        self
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_qualification(mut self, qualification: impl Into<String>) -> Self {
        self.qualification = Some(qualification.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// `tel:` URI for the listing's phone number.
    pub fn dial_uri(&self) -> Option<String> {
        self.phone.as_ref().map(|p| format!("tel:{}", p.trim()))
    }

    /// WhatsApp click-to-chat URL built from the digits of the phone number.
    pub fn whatsapp_url(&self) -> Option<String> {
        let digits: String = self
            .phone
            .as_deref()?
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return None;
        }
        Some(format!("https://wa.me/{}", digits))
    }

    /// Posting timestamp, from RFC 3339 or a bare `YYYY-MM-DD` date.
    pub fn posted_on(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_on.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

// =============================================================================
// LENIENT FIELD DESERIALIZERS
// =============================================================================

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(value.and_then(text_of))
}

fn text_of(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if s.trim().is_empty() => None,
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32)),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Only an object is a call window; any other shape reads as absent.
fn lenient_contact<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ContactPreference>, D::Error> {
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ JsonValue::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Array(items)) => items.into_iter().filter_map(text_of).collect(),
        Some(JsonValue::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_from_string_and_integer_match() {
        let a: RecordId = serde_json::from_value(json!("42")).unwrap();
        let b: RecordId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "42");
    }

    #[test]
    fn test_record_id_rejects_empty() {
        let result: Result<RecordId, _> = serde_json::from_value(json!("  "));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_deserializes_wire_names() {
        let record: Record = serde_json::from_value(json!({
            "id": 7,
            "title": "Software Engineer",
            "company": "Acme",
            "jobType": "Full Time",
            "job_category": "IT",
            "job_role": "Backend",
            "createdOn": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, RecordId::from(7i64));
        assert_eq!(record.job_type.as_deref(), Some("Full Time"));
        assert_eq!(record.category.as_deref(), Some("IT"));
        assert_eq!(record.role.as_deref(), Some("Backend"));
        assert!(record.posted_on().is_some());
    }

    #[test]
    fn test_missing_null_and_empty_fields_are_absent() {
        let record: Record = serde_json::from_value(json!({
            "id": "a1",
            "title": null,
            "company": "",
            "location": "   "
        }))
        .unwrap();

        assert!(record.title.is_none());
        assert!(record.company.is_none());
        assert!(record.location.is_none());
        assert!(record.salary.is_none());
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_numeric_descriptors_become_text() {
        let record: Record = serde_json::from_value(json!({
            "id": 1,
            "salary": 25000,
            "vacancies": "3"
        }))
        .unwrap();

        assert_eq!(record.salary.as_deref(), Some("25000"));
        assert_eq!(record.vacancies, Some(3));
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let result: Result<Record, _> = serde_json::from_value(json!({ "title": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let input = json!({
            "id": "9",
            "title": "Driver",
            "primary_details": { "Place": "Pune" }
        });
        let record: Record = serde_json::from_value(input).unwrap();
        assert!(record.extra.contains_key("primary_details"));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["primary_details"]["Place"], "Pune");
        assert_eq!(back["id"], "9");
    }

    #[test]
    fn test_contact_helpers() {
        let record = Record::new("1").with_phone("+91 98765-43210");
        assert_eq!(record.dial_uri().as_deref(), Some("tel:+91 98765-43210"));
        assert_eq!(
            record.whatsapp_url().as_deref(),
            Some("https://wa.me/919876543210")
        );

        let no_phone = Record::new("2");
        assert!(no_phone.dial_uri().is_none());
        assert!(no_phone.whatsapp_url().is_none());

        let no_digits = Record::new("3").with_phone("n/a");
        assert!(no_digits.whatsapp_url().is_none());
    }

    #[test]
    fn test_posted_on_accepts_plain_date() {
        let mut record = Record::new("1");
        record.created_on = Some("2024-05-17".to_string());
        let ts = record.posted_on().unwrap();
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-05-17");

        record.created_on = Some("yesterday".to_string());
        assert!(record.posted_on().is_none());
    }

    #[test]
    fn test_tags_accept_mixed_values() {
        let record: Record = serde_json::from_value(json!({
            "id": 1,
            "tags": ["urgent", 5, null, ""]
        }))
        .unwrap();
        assert_eq!(record.tags, vec!["urgent".to_string(), "5".to_string()]);
    }

    #[test]
    fn test_contact_preference_tolerates_non_objects() {
        for junk in [json!(""), json!("9am-5pm"), json!(7), json!([]), json!(null)] {
            let record: Record = serde_json::from_value(json!({
                "id": 2,
                "title": "Cook",
                "contact_preference": junk
            }))
            .unwrap();
            assert_eq!(record.title.as_deref(), Some("Cook"));
            assert!(record.contact_preference.is_none());
        }

        let record: Record = serde_json::from_value(json!({
            "id": 3,
            "contact_preference": { "preferred_call_start_time": "09:00", "preferred_call_end_time": 17 }
        }))
        .unwrap();
        let window = record.contact_preference.unwrap();
        assert_eq!(window.preferred_call_start_time.as_deref(), Some("09:00"));
        assert_eq!(window.preferred_call_end_time.as_deref(), Some("17"));
    }
}
