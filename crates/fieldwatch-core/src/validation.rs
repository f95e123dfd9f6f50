//! Field validation shared by every record schema.
//!
//! A [`Checker`] walks the fields of one draft and records what is wrong
//! with them. Each accessor hands back the cleaned value or `None`; a
//! `None` is always paired with a recorded violation, so callers can bail
//! out as soon as any required value is missing and still report
//! everything at once.
//!
//! Two rules shape the messages:
//!
//! 1. All missing required fields produce ONE combined violation listing
//!    them in the order they were checked.
//! 2. Every out-of-vocabulary or malformed value produces its own
//!    violation naming the field and the offending value.

use core::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use fieldwatch_types::UserId;

use crate::error::Violations;

/// Accepted layout for bare calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accumulates violations while a draft is turned into a record.
#[derive(Debug, Default)]
pub struct Checker {
    missing: Vec<&'static str>,
    invalid: Vec<String>,
}

impl Checker {
    /// Start a fresh check with nothing recorded.
    pub const fn new() -> Self {
        Self {
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// A required free-text field. Surrounding whitespace is removed;
    /// absent or blank values are recorded as missing.
    pub fn required(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let value = trimmed(value);
        if value.is_none() {
            self.missing.push(field);
        }
        value
    }

    /// A required vocabulary field.
    pub fn required_member<V: FromStr>(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<String>,
    ) -> Option<V> {
        let raw = self.required(field, value)?;
        self.member(label, &raw)
    }

    /// An optional vocabulary field that falls back to `V::default()` when
    /// absent. A blank string counts as missing, not as absent.
    pub fn member_or_default<V: FromStr + Default>(
        &mut self,
        field: &'static str,
        label: &str,
        value: Option<String>,
    ) -> Option<V> {
        match value {
            None => Some(V::default()),
            Some(raw) => {
                let raw = self.required(field, Some(raw))?;
                self.member(label, &raw)
            }
        }
    }

    /// A required calendar date.
    ///
    /// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, whose UTC date
    /// is kept.
    pub fn required_date(&mut self, field: &'static str, value: Option<String>) -> Option<NaiveDate> {
        let raw = self.required(field, value)?;
        let parsed = NaiveDate::parse_from_str(&raw, DATE_FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        });
        if parsed.is_none() {
            self.invalid.push(format!("Invalid {field}: {raw}"));
        }
        parsed
    }

    /// An optional RFC 3339 timestamp. Blank or absent yields `Some(None)`;
    /// a malformed value is recorded and yields `None`.
    pub fn optional_timestamp(
        &mut self,
        field: &'static str,
        value: Option<String>,
    ) -> Option<Option<DateTime<Utc>>> {
        let Some(raw) = trimmed(value) else {
            return Some(None);
        };
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Some(Some(ts.with_timezone(&Utc))),
            Err(_) => {
                self.invalid.push(format!("Invalid {field}: {raw}"));
                None
            }
        }
    }

    /// An optional user reference.
    pub fn optional_user(&mut self, field: &'static str, value: Option<String>) -> Option<Option<UserId>> {
        let Some(raw) = trimmed(value) else {
            return Some(None);
        };
        if let Some(id) = UserId::parse(&raw) {
            Some(Some(id))
        } else {
            self.invalid.push(format!("Invalid {field}: {raw}"));
            None
        }
    }

    /// Finish the check, returning every recorded violation.
    ///
    /// The combined missing-fields message always comes first.
    pub fn finish(self) -> Result<(), Violations> {
        let violations = self.into_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Consume the checker into its violations, possibly empty.
    pub fn into_violations(self) -> Violations {
        let mut violations = Violations::new();
        if !self.missing.is_empty() {
            violations.push(format!(
                "Please provide all required fields: {}",
                self.missing.join(", ")
            ));
        }
        for message in self.invalid {
            violations.push(message);
        }
        violations
    }

    fn member<V: FromStr>(&mut self, label: &str, raw: &str) -> Option<V> {
        let parsed = raw.parse::<V>().ok();
        if parsed.is_none() {
            self.invalid.push(format!("Invalid {label}: {raw}"));
        }
        parsed
    }
}

/// Trim an optional text field, turning blank input into `None`.
pub fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else if t.len() == s.len() {
            Some(s)
        } else {
            Some(t.to_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use fieldwatch_types::{AnimalType, ObservationStatus, TimeOfDay};

    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_owned())
    }

    #[test]
    fn missing_fields_are_combined_into_one_message() {
        let mut check = Checker::new();
        let _ = check.required("animalType", None);
        let _ = check.required("photo", some("   "));
        let _ = check.required("date", some("2024-05-01"));
        let violations = check.into_violations();
        assert_eq!(
            violations.messages(),
            ["Please provide all required fields: animalType, photo"]
        );
    }

    #[test]
    fn required_trims_whitespace() {
        let mut check = Checker::new();
        assert_eq!(check.required("photo", some("  img://1 ")), some("img://1"));
        assert!(check.finish().is_ok());
    }

    #[test]
    fn out_of_vocabulary_names_field_and_value() {
        let mut check = Checker::new();
        let animal: Option<AnimalType> =
            check.required_member("animalType", AnimalType::LABEL, some("Dragon"));
        let time: Option<TimeOfDay> =
            check.required_member("timeOfDay", TimeOfDay::LABEL, some("Dusk"));
        assert!(animal.is_none());
        assert!(time.is_none());
        assert_eq!(
            check.into_violations().messages(),
            ["Invalid animal type: Dragon", "Invalid time of day: Dusk"]
        );
    }

    #[test]
    fn missing_message_precedes_invalid_values() {
        let mut check = Checker::new();
        let _: Option<TimeOfDay> = check.required_member("timeOfDay", TimeOfDay::LABEL, some("Dusk"));
        let _ = check.required("photo", None);
        let messages = check.into_violations().into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages.first().map(String::as_str),
            Some("Please provide all required fields: photo")
        );
    }

    #[test]
    fn member_or_default_fills_absent_value() {
        let mut check = Checker::new();
        let status: Option<ObservationStatus> =
            check.member_or_default("status", ObservationStatus::LABEL, None);
        assert_eq!(status, Some(ObservationStatus::Pending));
        let status: Option<ObservationStatus> =
            check.member_or_default("status", ObservationStatus::LABEL, some("approved"));
        assert_eq!(status, Some(ObservationStatus::Approved));
        assert!(check.finish().is_ok());
    }

    #[test]
    fn member_or_default_rejects_blank_and_unknown() {
        let mut check = Checker::new();
        let blank: Option<ObservationStatus> =
            check.member_or_default("status", ObservationStatus::LABEL, some(""));
        let unknown: Option<ObservationStatus> =
            check.member_or_default("status", ObservationStatus::LABEL, some("done"));
        assert!(blank.is_none());
        assert!(unknown.is_none());
        assert_eq!(
            check.into_violations().messages(),
            [
                "Please provide all required fields: status",
                "Invalid status: done"
            ]
        );
    }

    #[test]
    fn dates_accept_plain_and_rfc3339() {
        let mut check = Checker::new();
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(check.required_date("date", some("2024-05-01")), expected);
        assert_eq!(
            check.required_date("date", some("2024-05-01T08:30:00.000Z")),
            expected
        );
        assert!(check.finish().is_ok());
    }

    #[test]
    fn bad_date_is_a_violation() {
        let mut check = Checker::new();
        assert!(check.required_date("date", some("2024-13-01")).is_none());
        assert_eq!(check.into_violations().messages(), ["Invalid date: 2024-13-01"]);
    }

    #[test]
    fn optional_user_reference() {
        let mut check = Checker::new();
        assert_eq!(check.optional_user("userId", None), Some(None));
        assert_eq!(check.optional_user("userId", some(" ")), Some(None));
        let id = UserId::new();
        assert_eq!(
            check.optional_user("userId", Some(id.to_string())),
            Some(Some(id))
        );
        assert!(check.optional_user("userId", some("bob")).is_none());
        assert_eq!(check.into_violations().messages(), ["Invalid userId: bob"]);
    }

    #[test]
    fn trimmed_drops_blank_text() {
        assert_eq!(trimmed(some("  ")), None);
        assert_eq!(trimmed(some(" oak ")), some("oak"));
        assert_eq!(trimmed(None), None);
    }
}
