use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, CandidateId, EntityRef, JobId, UnknownStatus,
};
use super::repository::{
    RecruitmentRepository, RepositoryError, StatusChangeEvent, StatusChangeNotifier,
};

/// Status machine over applications.
///
/// Any recognised status may be written directly (new -> offer, or out of a
/// terminal state); the pipeline validates the value and the referenced
/// records, persists, and emits a [`StatusChangeEvent`]. Scheduling follow-up
/// work such as interviews is left to the notifier.
pub struct ApplicationPipeline<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> ApplicationPipeline<R, N>
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Open an application in `new` after confirming both records exist.
    pub fn create(
        &self,
        job_id: JobId,
        candidate_id: CandidateId,
        cover_letter: Option<String>,
    ) -> Result<Application, PipelineError> {
        if self.repository.fetch_job(&job_id)?.is_none() {
            return Err(PipelineError::NotFound(EntityRef::Job(job_id)));
        }
        if self.repository.fetch_candidate(&candidate_id)?.is_none() {
            return Err(PipelineError::NotFound(EntityRef::Candidate(candidate_id)));
        }

        let duplicate = self.repository.applications()?.into_iter().any(|existing| {
            existing.job_id == job_id
                && existing.candidate_id == candidate_id
                && existing.status != ApplicationStatus::Rejected
        });
        if duplicate {
            warn!(%job_id, %candidate_id, "candidate already has an active application for job");
        }

        let now = Utc::now();
        let application = Application {
            id: ApplicationId::generate(),
            job_id,
            candidate_id,
            cover_letter: cover_letter.filter(|letter| !letter.trim().is_empty()),
            status: ApplicationStatus::New,
            notes: None,
            applied_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_application(application)?;
        info!(application_id = %stored.id, job_id = %stored.job_id, "application created");
        Ok(stored)
    }

    /// Parse `status` and write it to one application.
    pub fn set_status(
        &self,
        application_id: &ApplicationId,
        status: &str,
        notes: Option<String>,
    ) -> Result<Application, PipelineError> {
        let status = status.parse::<ApplicationStatus>()?;
        self.apply_status(application_id, status, notes)
    }

    pub fn apply_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application, PipelineError> {
        let (previous, stored) = self
            .repository
            .write_application_status(application_id, status, notes)
            .map_err(|err| match err {
                RepositoryError::NotFound => {
                    PipelineError::NotFound(EntityRef::Application(application_id.clone()))
                }
                other => PipelineError::Repository(other),
            })?;

        if previous.is_terminal() && previous != status {
            warn!(
                application_id = %stored.id,
                from = %previous,
                to = %status,
                "status rewritten after terminal state"
            );
        } else {
            info!(application_id = %stored.id, from = %previous, to = %status, "status updated");
        }

        let event = StatusChangeEvent {
            application_id: stored.id.clone(),
            job_id: stored.job_id.clone(),
            candidate_id: stored.candidate_id.clone(),
            from: previous,
            to: status,
        };
        if let Err(err) = self.notifier.status_changed(event) {
            warn!(application_id = %stored.id, error = %err, "status change notification failed");
        }

        Ok(stored)
    }

    /// Apply one status to a set of applications with per-id outcomes.
    ///
    /// Ids are deduplicated and processed in sorted order; a failure on one id
    /// never prevents the others from being written. An unrecognised status
    /// aborts the whole request.
    pub fn bulk_set_status<I>(
        &self,
        application_ids: I,
        status: &str,
        notes: Option<String>,
    ) -> Result<BulkUpdateOutcome, PipelineError>
    where
        I: IntoIterator<Item = ApplicationId>,
    {
        let status = status.parse::<ApplicationStatus>()?;
        let targets: BTreeSet<ApplicationId> = application_ids.into_iter().collect();

        let mut outcome = BulkUpdateOutcome {
            status,
            updated_count: 0,
            updated: Vec::new(),
            failures: Vec::new(),
        };

        for application_id in targets {
            match self.apply_status(&application_id, status, notes.clone()) {
                Ok(stored) => {
                    outcome.updated_count += 1;
                    outcome.updated.push(stored.id);
                }
                Err(err) => outcome.failures.push(BulkFailure {
                    application_id,
                    error: err.to_string(),
                }),
            }
        }

        info!(
            status = %status,
            updated = outcome.updated_count,
            failed = outcome.failures.len(),
            "bulk status update finished"
        );
        Ok(outcome)
    }
}

/// Per-id report for a bulk status update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUpdateOutcome {
    pub status: ApplicationStatus,
    pub updated_count: usize,
    pub updated: Vec<ApplicationId>,
    pub failures: Vec<BulkFailure>,
}

impl BulkUpdateOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub application_id: ApplicationId,
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0} not found")]
    NotFound(EntityRef),
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
