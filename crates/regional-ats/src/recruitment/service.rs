use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::dashboard::{DashboardAggregator, DashboardStats};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, Candidate, CandidateId, EntityRef, Interview,
    InterviewId, InterviewStatus, InterviewType, Job, JobId, JobStatus, VisaStatus,
};
use super::intake::{CandidateDraft, IntakeGuard, JobDraft, ValidationError};
use super::pipeline::{ApplicationPipeline, BulkUpdateOutcome, PipelineError};
use super::repository::{RecruitmentRepository, RepositoryError, StatusChangeNotifier};
use super::scoring::{ScoreBreakdown, ScoringEngine};
use super::visa::{VerdictCache, VisaVerdict};

/// Filters accepted by `GET /api/candidates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateFilter {
    pub location: Option<String>,
    pub visa_status: Option<VisaStatus>,
    pub sponsorship_needed: Option<bool>,
}

/// Filters accepted by `GET /api/applications`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationFilter {
    pub job_id: Option<JobId>,
    pub candidate_id: Option<CandidateId>,
    pub status: Option<ApplicationStatus>,
}

/// Service composing the repository, scoring, visa cache, pipeline and
/// dashboard aggregation behind the HTTP surface.
pub struct RecruitmentService<R, N> {
    repository: Arc<R>,
    pipeline: ApplicationPipeline<R, N>,
    verdicts: VerdictCache,
}

impl<R, N> RecruitmentService<R, N>
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        let pipeline = ApplicationPipeline::new(repository.clone(), notifier);
        Self {
            repository,
            pipeline,
            verdicts: VerdictCache::default(),
        }
    }

    pub fn create_job(&self, draft: JobDraft) -> Result<Job, RecruitmentError> {
        let job = IntakeGuard::job(draft, None, Utc::now())?;
        let stored = self.repository.insert_job(job)?;
        info!(job_id = %stored.id, location = stored.location.label(), "job created");
        Ok(stored)
    }

    pub fn update_job(&self, id: &JobId, draft: JobDraft) -> Result<Job, RecruitmentError> {
        let existing = self.require_job(id)?;
        let job = IntakeGuard::job(draft, Some(&existing), Utc::now())?;

        self.repository.update_job(job.clone())?;
        if existing.visa_fields_differ(&job) {
            self.verdicts.invalidate_job(id);
        }
        info!(job_id = %id, "job updated");
        Ok(job)
    }

    pub fn get_job(&self, id: &JobId) -> Result<Job, RecruitmentError> {
        self.require_job(id)
    }

    /// Jobs newest first, optionally restricted to one status.
    pub fn list_jobs(&self, status: Option<JobStatus>) -> Result<Vec<Job>, RecruitmentError> {
        let mut jobs: Vec<Job> = self
            .repository
            .jobs()?
            .into_iter()
            .filter(|job| status.map_or(true, |wanted| job.status == wanted))
            .collect();
        jobs.sort_by(|a, b| newest_first(a.created_at, b.created_at));
        Ok(jobs)
    }

    /// Validate, score and store a new candidate.
    pub fn create_candidate(&self, draft: CandidateDraft) -> Result<Candidate, RecruitmentError> {
        let profile = IntakeGuard::candidate_profile(draft)?;
        let candidate = Candidate::from_profile(CandidateId::generate(), profile, Utc::now());
        let stored = self.repository.insert_candidate(candidate)?;
        info!(candidate_id = %stored.id, score = stored.score(), "candidate created");
        Ok(stored)
    }

    /// Replace a candidate's profile. The score is recomputed before the
    /// record is written, and cached visa verdicts are dropped when any field
    /// they read has changed.
    pub fn update_candidate(
        &self,
        id: &CandidateId,
        draft: CandidateDraft,
    ) -> Result<Candidate, RecruitmentError> {
        let profile = IntakeGuard::candidate_profile(draft)?;
        let mut candidate = self.require_candidate(id)?;
        let visa_changed = candidate.visa_fields_differ(&profile);

        candidate.apply_profile(profile, Utc::now());
        self.repository.update_candidate(candidate.clone())?;

        if visa_changed {
            self.verdicts.invalidate_candidate(id);
        }
        info!(candidate_id = %id, score = candidate.score(), "candidate updated");
        Ok(candidate)
    }

    pub fn get_candidate(&self, id: &CandidateId) -> Result<Candidate, RecruitmentError> {
        self.require_candidate(id)
    }

    /// Candidates matching `filter`, highest score first.
    pub fn list_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<Candidate>, RecruitmentError> {
        let location = filter
            .location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_lowercase);

        let mut candidates: Vec<Candidate> = self
            .repository
            .candidates()?
            .into_iter()
            .filter(|candidate| {
                location.as_ref().map_or(true, |needle| {
                    candidate
                        .profile
                        .location
                        .to_ascii_lowercase()
                        .contains(needle.as_str())
                })
            })
            .filter(|candidate| {
                filter
                    .visa_status
                    .map_or(true, |status| candidate.profile.visa_status == status)
            })
            .filter(|candidate| {
                filter
                    .sponsorship_needed
                    .map_or(true, |needed| candidate.profile.sponsorship_needed == needed)
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(Ordering::Equal)
                .then_with(|| newest_first(a.created_at, b.created_at))
        });
        Ok(candidates)
    }

    pub fn score_breakdown(&self, id: &CandidateId) -> Result<ScoreBreakdown, RecruitmentError> {
        let candidate = self.require_candidate(id)?;
        Ok(ScoringEngine::breakdown(&candidate.profile))
    }

    /// Visa verdict for a candidate, optionally against a specific job.
    pub fn evaluate_visa(
        &self,
        candidate_id: &CandidateId,
        job_id: Option<&JobId>,
    ) -> Result<VisaVerdict, RecruitmentError> {
        let candidate = self.require_candidate(candidate_id)?;
        let job = job_id.map(|id| self.require_job(id)).transpose()?;
        Ok(self.verdicts.get_or_evaluate(&candidate, job.as_ref()))
    }

    pub fn create_application(
        &self,
        job_id: JobId,
        candidate_id: CandidateId,
        cover_letter: Option<String>,
    ) -> Result<Application, RecruitmentError> {
        Ok(self.pipeline.create(job_id, candidate_id, cover_letter)?)
    }

    pub fn set_application_status(
        &self,
        id: &ApplicationId,
        status: &str,
        notes: Option<String>,
    ) -> Result<Application, RecruitmentError> {
        Ok(self.pipeline.set_status(id, status, notes)?)
    }

    pub fn bulk_set_application_status(
        &self,
        ids: Vec<ApplicationId>,
        status: &str,
        notes: Option<String>,
    ) -> Result<BulkUpdateOutcome, RecruitmentError> {
        Ok(self.pipeline.bulk_set_status(ids, status, notes)?)
    }

    /// Applications matching `filter`, newest first.
    pub fn list_applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Application>, RecruitmentError> {
        let mut applications: Vec<Application> = self
            .repository
            .applications()?
            .into_iter()
            .filter(|app| filter.job_id.as_ref().map_or(true, |id| &app.job_id == id))
            .filter(|app| {
                filter
                    .candidate_id
                    .as_ref()
                    .map_or(true, |id| &app.candidate_id == id)
            })
            .filter(|app| filter.status.map_or(true, |status| app.status == status))
            .collect();
        applications.sort_by(|a, b| newest_first(a.applied_at, b.applied_at));
        Ok(applications)
    }

    pub fn schedule_interview(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        interview_type: InterviewType,
        scheduled_date: DateTime<Utc>,
    ) -> Result<Interview, RecruitmentError> {
        self.require_candidate(&candidate_id)?;
        self.require_job(&job_id)?;

        let now = Utc::now();
        let interview = Interview {
            id: InterviewId::generate(),
            candidate_id,
            job_id,
            interview_type,
            status: InterviewStatus::Scheduled,
            scheduled_date,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repository.insert_interview(interview)?;
        info!(interview_id = %stored.id, "interview scheduled");
        Ok(stored)
    }

    /// Interviews are only ever moved between statuses, never removed.
    pub fn set_interview_status(
        &self,
        id: &InterviewId,
        status: InterviewStatus,
    ) -> Result<Interview, RecruitmentError> {
        let mut interview = self
            .repository
            .fetch_interview(id)?
            .ok_or_else(|| RecruitmentError::NotFound(EntityRef::Interview(id.clone())))?;
        interview.status = status;
        interview.updated_at = Utc::now();
        self.repository.update_interview(interview.clone())?;
        Ok(interview)
    }

    pub fn list_interviews(&self) -> Result<Vec<Interview>, RecruitmentError> {
        let mut interviews = self.repository.interviews()?;
        interviews.sort_by_key(|interview| interview.scheduled_date);
        Ok(interviews)
    }

    pub fn dashboard(&self) -> Result<DashboardStats, RecruitmentError> {
        let jobs = self.repository.jobs()?;
        let candidates = self.repository.candidates()?;
        let applications = self.repository.applications()?;
        Ok(DashboardAggregator::aggregate(
            &jobs,
            &candidates,
            &applications,
        ))
    }

    fn require_job(&self, id: &JobId) -> Result<Job, RecruitmentError> {
        self.repository
            .fetch_job(id)?
            .ok_or_else(|| RecruitmentError::NotFound(EntityRef::Job(id.clone())))
    }

    fn require_candidate(&self, id: &CandidateId) -> Result<Candidate, RecruitmentError> {
        self.repository
            .fetch_candidate(id)?
            .ok_or_else(|| RecruitmentError::NotFound(EntityRef::Candidate(id.clone())))
    }
}

fn newest_first(a: DateTime<Utc>, b: DateTime<Utc>) -> Ordering {
    b.cmp(&a)
}

/// Error raised by the recruitment service.
#[derive(Debug, thiserror::Error)]
pub enum RecruitmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0} not found")]
    NotFound(EntityRef),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RecruitmentError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(detail) => Self::Conflict(detail),
            other => Self::Repository(other),
        }
    }
}

impl From<PipelineError> for RecruitmentError {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::NotFound(entity) => Self::NotFound(entity),
            PipelineError::InvalidStatus(unknown) => Self::InvalidStatus(unknown.0),
            PipelineError::Repository(err) => err.into(),
        }
    }
}
