use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::scoring::ScoringEngine;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

record_id!(
    /// Identifier wrapper for advertised jobs.
    JobId
);
record_id!(
    /// Identifier wrapper for candidate records.
    CandidateId
);
record_id!(
    /// Identifier wrapper for job applications.
    ApplicationId
);
record_id!(InterviewId);

/// Regional towns the business recruits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Mount Isa")]
    MountIsa,
    #[serde(rename = "Moranbah")]
    Moranbah,
    #[serde(rename = "Charters Towers")]
    ChartersTowers,
}

impl Location {
    pub const fn ordered() -> [Self; 3] {
        [Self::MountIsa, Self::Moranbah, Self::ChartersTowers]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MountIsa => "Mount Isa",
            Self::Moranbah => "Moranbah",
            Self::ChartersTowers => "Charters Towers",
        }
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::MountIsa => 0,
            Self::Moranbah => 1,
            Self::ChartersTowers => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Casual,
}

impl Default for EmploymentType {
    fn default() -> Self {
        Self::FullTime
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaStatus {
    Citizen,
    Permanent,
    Temporary,
    NeedsSponsorship,
}

impl VisaStatus {
    /// Citizens and permanent residents hold unrestricted work rights.
    pub const fn has_unrestricted_work_rights(self) -> bool {
        matches!(self, Self::Citizen | Self::Permanent)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
            Self::NeedsSponsorship => "needs_sponsorship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationWillingness {
    Yes,
    No,
    Maybe,
}

/// Ordered from weakest to strongest so comparisons follow proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnglishLevel {
    Basic,
    Good,
    Fluent,
    Native,
}

/// Status tracked through the application pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::New,
            Self::Screening,
            Self::Interview,
            Self::Offer,
            Self::Hired,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Screening => "screening",
            Self::Interview => "interview",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Hired | Self::Rejected)
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::New => 0,
            Self::Screening => 1,
            Self::Interview => 2,
            Self::Offer => 3,
            Self::Hired => 4,
            Self::Rejected => 5,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a status string does not name one of the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|status| status.label() == normalized)
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Phone,
    Video,
    InPerson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
    Rescheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub location: Location,
    pub sponsorship_eligible: bool,
    pub relocation_support: bool,
    pub housing_support: bool,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary_range: Option<String>,
    pub employment_type: EmploymentType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// True when any field the visa evaluator reads differs from `other`.
    pub fn visa_fields_differ(&self, other: &Job) -> bool {
        self.location != other.location
            || self.sponsorship_eligible != other.sponsorship_eligible
            || self.relocation_support != other.relocation_support
            || self.housing_support != other.housing_support
    }
}

/// Candidate record. `score` is derived from the profile and recomputed by
/// [`Candidate::from_profile`] and [`Candidate::apply_profile`]; callers cannot set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(flatten)]
    pub profile: CandidateProfile,
    score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn from_profile(id: CandidateId, profile: CandidateProfile, now: DateTime<Utc>) -> Self {
        let score = ScoringEngine::score(&profile);
        Self {
            id,
            profile,
            score,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_profile(&mut self, profile: CandidateProfile, now: DateTime<Utc>) {
        self.score = ScoringEngine::score(&profile);
        self.profile = profile;
        self.updated_at = now;
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// True when any field the visa evaluator reads differs from `other`.
    pub fn visa_fields_differ(&self, other: &CandidateProfile) -> bool {
        self.profile.visa_status != other.visa_status
            || self.profile.visa_type != other.visa_type
            || self.profile.sponsorship_needed != other.sponsorship_needed
            || self.profile.location != other.location
            || self.profile.relocation_willing != other.relocation_willing
            || self.profile.housing_needed != other.housing_needed
    }
}

/// Validated, scoring-relevant candidate attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub visa_status: VisaStatus,
    pub visa_type: Option<String>,
    pub sponsorship_needed: bool,
    pub childcare_cert: Option<String>,
    pub experience_years: u32,
    pub rural_experience: bool,
    pub relocation_willing: RelocationWillingness,
    pub housing_needed: bool,
    pub english_level: EnglishLevel,
    pub availability_start: Option<NaiveDate>,
    pub salary_expectation: Option<u32>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub status: InterviewStatus,
    pub scheduled_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference to a record used in not-found errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Job(JobId),
    Candidate(CandidateId),
    Application(ApplicationId),
    Interview(InterviewId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Job(id) => write!(f, "job {id}"),
            EntityRef::Candidate(id) => write!(f, "candidate {id}"),
            EntityRef::Application(id) => write!(f, "application {id}"),
            EntityRef::Interview(id) => write!(f, "interview {id}"),
        }
    }
}
