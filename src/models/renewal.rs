//! Loan renewal form and workflow step

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use super::book_instance::BookInstance;
use crate::config::CatalogConfig;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date bounds for renewals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalPolicy {
    pub proposal_days: i64,
    pub max_days: i64,
}

impl RenewalPolicy {
    pub fn proposed_date(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.proposal_days)
    }

    pub fn latest_date(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.max_days)
    }
}

impl Default for RenewalPolicy {
    fn default() -> Self {
        Self {
            proposal_days: 21,
            max_days: 28,
        }
    }
}

impl From<&CatalogConfig> for RenewalPolicy {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            proposal_days: config.renewal_proposal_days,
            max_days: config.renewal_max_days,
        }
    }
}

/// Submitted renewal form. The date is kept as text so a rejected value can be echoed back.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct RenewBookForm {
    /// New due date (YYYY-MM-DD)
    #[serde(default, deserialize_with = "submitted_text")]
    pub renewal_date: Option<String>,
}

/// Accept any JSON scalar so a malformed value still reaches `clean`
fn submitted_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn field_error(code: &'static str, message: &'static str) -> ValidationErrors {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    let mut errors = ValidationErrors::new();
    errors.add("renewal_date", error);
    errors
}

impl RenewBookForm {
    /// Parse and bound-check the submitted date against `today`
    pub fn clean(&self, today: NaiveDate, policy: RenewalPolicy) -> Result<NaiveDate, ValidationErrors> {
        let text = match self.renewal_date.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text,
            _ => return Err(field_error("required", "This field is required.")),
        };

        let date = NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|_| field_error("invalid", "Enter a valid date."))?;

        if date < today {
            return Err(field_error("renewal_in_past", "Invalid date - renewal in past"));
        }

        if date > policy.latest_date(today) {
            return Err(field_error(
                "renewal_too_far",
                "Invalid date - renewal more than 4 weeks ahead",
            ));
        }

        Ok(date)
    }
}

/// State of the renewal form shown to the caller
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalStep {
    pub book_instance: BookInstance,
    /// Proposed date on first display, submitted value after a rejected submission
    pub renewal_date: String,
    #[schema(value_type = Object)]
    pub errors: ValidationErrors,
}

impl RenewalStep {
    pub fn proposed(book_instance: BookInstance, date: NaiveDate) -> Self {
        Self {
            book_instance,
            renewal_date: date.format(DATE_FORMAT).to_string(),
            errors: ValidationErrors::new(),
        }
    }

    pub fn rejected(book_instance: BookInstance, form: RenewBookForm, errors: ValidationErrors) -> Self {
        Self {
            book_instance,
            renewal_date: form.renewal_date.unwrap_or_default(),
            errors,
        }
    }
}
