use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    CandidateProfile, EmploymentType, EnglishLevel, Job, JobId, JobStatus, Location,
    RelocationWillingness, VisaStatus,
};

/// Validation errors raised at the intake boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid e-mail address")]
    InvalidEmail(String),
    #[error("{field} must not be negative (found {value})")]
    NegativeValue { field: &'static str, value: i64 },
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("{field} must be YYYY-MM-DD or an RFC 3339 timestamp (found '{value}')")]
    InvalidDate { field: &'static str, value: String },
}

/// Payload for `POST /api/jobs` and `PUT /api/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub location: Location,
    #[serde(default)]
    pub sponsorship_eligible: bool,
    #[serde(default)]
    pub relocation_support: bool,
    #[serde(default)]
    pub housing_support: bool,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Payload for `POST /api/candidates` and `PUT /api/candidates/{id}`.
///
/// Numeric fields are signed so negative input is reported as a validation
/// error instead of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub visa_status: VisaStatus,
    #[serde(default)]
    pub visa_type: Option<String>,
    #[serde(default)]
    pub sponsorship_needed: bool,
    #[serde(default)]
    pub childcare_cert: Option<String>,
    #[serde(default)]
    pub experience_years: Option<i64>,
    #[serde(default)]
    pub rural_experience: bool,
    pub relocation_willing: RelocationWillingness,
    #[serde(default)]
    pub housing_needed: bool,
    pub english_level: EnglishLevel,
    #[serde(default)]
    pub availability_start: Option<String>,
    #[serde(default)]
    pub salary_expectation: Option<i64>,
    #[serde(default)]
    pub notes: String,
}

/// Converts drafts into records, rejecting malformed input.
pub struct IntakeGuard;

impl IntakeGuard {
    /// Build a job from a draft. When `existing` is supplied its identity,
    /// creation time and (unless overridden) status are preserved.
    pub fn job(
        draft: JobDraft,
        existing: Option<&Job>,
        now: DateTime<Utc>,
    ) -> Result<Job, ValidationError> {
        let title = required("title", draft.title)?;
        let description = required("description", draft.description)?;

        let requirements = draft
            .requirements
            .unwrap_or_default()
            .into_iter()
            .map(|requirement| requirement.trim().to_string())
            .filter(|requirement| !requirement.is_empty())
            .collect();

        let (id, created_at, current_status) = match existing {
            Some(job) => (job.id.clone(), job.created_at, job.status),
            None => (JobId::generate(), now, JobStatus::Active),
        };

        Ok(Job {
            id,
            title,
            location: draft.location,
            sponsorship_eligible: draft.sponsorship_eligible,
            relocation_support: draft.relocation_support,
            housing_support: draft.housing_support,
            description,
            requirements,
            salary_range: optional_text(draft.salary_range),
            employment_type: draft.employment_type,
            status: draft.status.unwrap_or(current_status),
            created_at,
            updated_at: now,
        })
    }

    pub fn candidate_profile(draft: CandidateDraft) -> Result<CandidateProfile, ValidationError> {
        let full_name = required("full_name", draft.full_name)?;
        let email = required("email", draft.email)?;
        if !looks_like_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        let experience_years = match draft.experience_years {
            Some(value) => non_negative("experience_years", value)?,
            None => 0,
        };
        let salary_expectation = draft
            .salary_expectation
            .map(|value| non_negative("salary_expectation", value))
            .transpose()?;
        let availability_start = draft
            .availability_start
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_availability)
            .transpose()?;

        // Visa type only carries meaning for non-citizens.
        let visa_type = match draft.visa_status {
            VisaStatus::Citizen => None,
            _ => optional_text(draft.visa_type),
        };

        Ok(CandidateProfile {
            full_name,
            email: email.to_ascii_lowercase(),
            phone: draft.phone.trim().to_string(),
            location: draft.location.trim().to_string(),
            visa_status: draft.visa_status,
            visa_type,
            sponsorship_needed: draft.sponsorship_needed,
            childcare_cert: optional_text(draft.childcare_cert),
            experience_years,
            rural_experience: draft.rural_experience,
            relocation_willing: draft.relocation_willing,
            housing_needed: draft.housing_needed,
            english_level: draft.english_level,
            availability_start,
            salary_expectation,
            notes: draft.notes,
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange { field, value })
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

pub(crate) fn parse_availability(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|stamp| stamp.date_naive()))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|stamp| stamp.date())
        })
        .map_err(|_| ValidationError::InvalidDate {
            field: "availability_start",
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2025, 11, 3).expect("valid date");
        assert_eq!(parse_availability("2025-11-03"), Ok(expected));
        assert_eq!(parse_availability("2025-11-03T09:30:00Z"), Ok(expected));
        assert_eq!(parse_availability("2025-11-03T09:30:00.123456"), Ok(expected));
        assert!(parse_availability("next tuesday").is_err());
    }

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("jo@example.com"));
        assert!(!looks_like_email("jo.example.com"));
        assert!(!looks_like_email("jo@localhost"));
        assert!(!looks_like_email("j o@example.com"));
    }
}
