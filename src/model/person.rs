//! Person record and the rules a record must satisfy before it is stored.

use std::{borrow::Cow, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

static MOBILE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid mobile number regex"));

/// Opaque identifier of a stored person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(Uuid);

impl PersonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns `None` for anything that is not a well-formed id.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown gender `{0}`")]
pub struct UnknownGender(String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

/// A stored person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub mobile_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn create(draft: PersonDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: PersonId::new(),
            name: draft.name,
            age: draft.age,
            gender: draft.gender,
            mobile_number: draft.mobile_number,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the business fields, keeping `id` and `created_at`.
    ///
    /// `updated_at` always moves forward, even if the clock reads the same instant twice.
    pub fn apply(&mut self, draft: PersonDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.age = draft.age;
        self.gender = draft.gender;
        self.mobile_number = draft.mobile_number;
        self.updated_at = now.max(self.updated_at + chrono::Duration::microseconds(1));
    }
}

/// The business fields of a person, all present and valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub mobile_number: String,
}

/// Person fields as sent by a client.
///
/// Every field is optional so the same shape serves creation and partial updates.
/// Rules only apply to supplied fields; [`PersonPayload::into_draft`] adds the presence check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Age must not be negative"))]
    pub age: Option<i64>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(custom(function = "validate_mobile_number"))]
    pub mobile_number: Option<String>,
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    gender.parse::<Gender>().map(|_| ()).map_err(|_| {
        ValidationError::new("gender")
            .with_message(Cow::Borrowed("Gender must be one of Male, Female, Other"))
    })
}

fn validate_mobile_number(mobile_number: &str) -> Result<(), ValidationError> {
    if MOBILE_NUMBER_RE.is_match(mobile_number) {
        return Ok(());
    }

    Err(ValidationError::new("mobile_number")
        .with_message(Cow::Borrowed("Please enter a valid 10-digit mobile number")))
}

impl PersonPayload {
    /// Trims `name` and `mobileNumber`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|name| name.trim().to_string()),
            age: self.age,
            gender: self.gender,
            mobile_number: self
                .mobile_number
                .map(|mobile_number| mobile_number.trim().to_string()),
        }
    }

    /// Fills every field the client left out with the stored value.
    pub fn merged_over(self, person: &Person) -> Self {
        Self {
            name: self.name.or_else(|| Some(person.name.clone())),
            age: self.age.or(Some(person.age)),
            gender: self
                .gender
                .or_else(|| Some(person.gender.as_str().to_string())),
            mobile_number: self
                .mobile_number
                .or_else(|| Some(person.mobile_number.clone())),
        }
    }

    /// Normalizes, validates and requires every field.
    ///
    /// All failing fields are reported at once.
    pub fn into_draft(self) -> Result<PersonDraft, ValidationErrors> {
        let payload = self.normalized();

        let mut errors = payload.validate().err().unwrap_or_else(ValidationErrors::new);

        for (field, present) in [
            ("name", payload.name.is_some()),
            ("age", payload.age.is_some()),
            ("gender", payload.gender.is_some()),
            ("mobileNumber", payload.mobile_number.is_some()),
        ] {
            if !present {
                errors.add(field, required(field));
            }
        }

        // Unknown genders were already reported by `validate_gender`.
        let gender = payload
            .gender
            .as_deref()
            .and_then(|gender| gender.parse::<Gender>().ok());

        match (payload.name, payload.age, gender, payload.mobile_number) {
            (Some(name), Some(age), Some(gender), Some(mobile_number)) if errors.is_empty() => {
                Ok(PersonDraft {
                    name,
                    age,
                    gender,
                    mobile_number,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(field: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Owned(format!("{field} is required")))
}

impl From<&Person> for PersonPayload {
    fn from(person: &Person) -> Self {
        Self {
            name: Some(person.name.clone()),
            age: Some(person.age),
            gender: Some(person.gender.as_str().to_string()),
            mobile_number: Some(person.mobile_number.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::field_errors;

    use super::*;

    fn payload() -> PersonPayload {
        PersonPayload {
            name: Some("Ada Lovelace".to_string()),
            age: Some(36),
            gender: Some("Female".to_string()),
            mobile_number: Some("1234567890".to_string()),
        }
    }

    fn failing_fields(payload: PersonPayload) -> Vec<String> {
        let errors = payload.into_draft().expect_err("payload should be rejected");

        field_errors(&errors)
            .into_iter()
            .map(|error| error.field)
            .collect()
    }

    #[test]
    fn valid_payload_becomes_draft() {
        let draft = payload().into_draft().expect("valid payload");

        assert_eq!(
            draft,
            PersonDraft {
                name: "Ada Lovelace".to_string(),
                age: 36,
                gender: Gender::Female,
                mobile_number: "1234567890".to_string(),
            }
        );
    }

    #[test]
    fn name_and_mobile_number_are_trimmed() {
        let draft = PersonPayload {
            name: Some("  Ada  ".to_string()),
            mobile_number: Some(" 1234567890\t".to_string()),
            ..payload()
        }
        .into_draft()
        .expect("valid payload");

        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.mobile_number, "1234567890");
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = PersonPayload {
            name: Some("   ".to_string()),
            ..payload()
        };

        assert_eq!(failing_fields(payload), vec!["name"]);
    }

    #[test]
    fn negative_age_is_rejected_and_zero_is_accepted() {
        let negative = PersonPayload {
            age: Some(-1),
            ..payload()
        };
        assert_eq!(failing_fields(negative), vec!["age"]);

        let zero = PersonPayload {
            age: Some(0),
            ..payload()
        };
        assert_eq!(zero.into_draft().expect("age zero is valid").age, 0);
    }

    #[test]
    fn gender_must_be_known() {
        let alien = PersonPayload {
            gender: Some("Alien".to_string()),
            ..payload()
        };
        assert_eq!(failing_fields(alien), vec!["gender"]);

        for (gender, expected) in [
            ("Male", Gender::Male),
            ("Female", Gender::Female),
            ("Other", Gender::Other),
        ] {
            let draft = PersonPayload {
                gender: Some(gender.to_string()),
                ..payload()
            }
            .into_draft()
            .expect("known gender");

            assert_eq!(draft.gender, expected);
        }
    }

    #[test]
    fn mobile_number_must_have_ten_digits() {
        for mobile_number in ["12345", "12345678901", "12345abcde"] {
            let payload = PersonPayload {
                mobile_number: Some(mobile_number.to_string()),
                ..payload()
            };

            assert_eq!(failing_fields(payload), vec!["mobileNumber"], "{mobile_number}");
        }
    }

    #[test]
    fn unknown_gender_is_reported_with_its_field_and_reason() {
        let errors = PersonPayload {
            gender: Some("male".to_string()),
            ..payload()
        }
        .into_draft()
        .expect_err("lowercase gender is not a known gender");

        let field_errors = field_errors(&errors);
        assert_eq!(field_errors.len(), 1);
        assert_eq!(field_errors[0].field, "gender");
        assert_eq!(
            field_errors[0].message,
            "Gender must be one of Male, Female, Other"
        );
    }

    #[test]
    fn missing_fields_are_all_reported() {
        assert_eq!(
            failing_fields(PersonPayload::default()),
            vec!["age", "gender", "mobileNumber", "name"]
        );
    }

    #[test]
    fn merge_keeps_stored_values_for_missing_fields() {
        let person = Person::create(payload().into_draft().expect("valid"), Utc::now());

        let merged = PersonPayload {
            age: Some(0),
            ..PersonPayload::default()
        }
        .merged_over(&person);

        assert_eq!(
            merged,
            PersonPayload {
                age: Some(0),
                ..PersonPayload::from(&person)
            }
        );
    }

    #[test]
    fn apply_moves_updated_at_forward() {
        let now = Utc::now();
        let mut person = Person::create(payload().into_draft().expect("valid"), now);

        person.apply(payload().into_draft().expect("valid"), now);

        assert_eq!(person.created_at, now);
        assert!(person.updated_at > person.created_at);
    }

    #[test]
    fn malformed_ids_do_not_parse() {
        assert!(PersonId::parse("not-an-id").is_none());
        assert!(PersonId::parse("").is_none());

        let id = PersonId::new();
        assert_eq!(PersonId::parse(&id.to_string()), Some(id));
    }
}
