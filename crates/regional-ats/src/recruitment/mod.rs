//! Recruitment core: candidate scoring, visa eligibility, the application
//! pipeline and dashboard aggregation, plus the service and HTTP router that
//! expose them.

pub mod dashboard;
pub mod domain;
pub mod intake;
pub mod pipeline;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod visa;

#[cfg(test)]
mod tests;

pub use dashboard::{DashboardAggregator, DashboardStats};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, Candidate, CandidateId, CandidateProfile,
    EmploymentType, EnglishLevel, EntityRef, Interview, InterviewId, InterviewStatus,
    InterviewType, Job, JobId, JobStatus, Location, RelocationWillingness, VisaStatus,
};
pub use intake::{CandidateDraft, IntakeGuard, JobDraft, ValidationError};
pub use pipeline::{ApplicationPipeline, BulkFailure, BulkUpdateOutcome, PipelineError};
pub use repository::{
    InMemoryRepository, NotifierError, RecruitmentRepository, RepositoryError, StatusChangeEvent,
    StatusChangeNotifier,
};
pub use router::recruitment_router;
pub use scoring::{ScoreBreakdown, ScoringEngine};
pub use service::{ApplicationFilter, CandidateFilter, RecruitmentError, RecruitmentService};
pub use visa::{VerdictCache, VisaEligibilityEvaluator, VisaVerdict};
