use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Candidate, CandidateId, Interview, InterviewId,
    Job, JobId,
};

/// Storage abstraction so the service can be exercised without a database.
///
/// Each method is one atomic write or read of a single collection. Inserts
/// and updates of candidates enforce e-mail uniqueness (case-insensitive).
pub trait RecruitmentRepository: Send + Sync {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError>;
    fn update_job(&self, job: Job) -> Result<(), RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError>;
    fn jobs(&self) -> Result<Vec<Job>, RepositoryError>;

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError>;
    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError>;
    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError>;

    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn fetch_application(&self, id: &ApplicationId)
        -> Result<Option<Application>, RepositoryError>;
    /// Overwrite status and notes in one step, returning the previous status
    /// alongside the stored record.
    fn write_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<(ApplicationStatus, Application), RepositoryError>;
    fn applications(&self) -> Result<Vec<Application>, RepositoryError>;

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn update_interview(&self, interview: Interview) -> Result<(), RepositoryError>;
    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn interviews(&self) -> Result<Vec<Interview>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Event emitted after every accepted status write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub application_id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

/// Outbound hook for collaborators reacting to pipeline moves, such as
/// interview booking.
pub trait StatusChangeNotifier: Send + Sync {
    fn status_changed(&self, event: StatusChangeEvent) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("notifier transport unavailable: {0}")]
    Transport(String),
    #[error("notifier rejected event: {0}")]
    Rejected(String),
}

/// Process-local repository. Each collection sits behind its own mutex and
/// every write completes under a single lock acquisition.
#[derive(Default, Clone)]
pub struct InMemoryRepository {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
    candidates: Arc<Mutex<HashMap<CandidateId, Candidate>>>,
    applications: Arc<Mutex<HashMap<ApplicationId, Application>>>,
    interviews: Arc<Mutex<HashMap<InterviewId, Interview>>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} store poisoned")))
}

fn email_taken(
    candidates: &HashMap<CandidateId, Candidate>,
    email: &str,
    except: &CandidateId,
) -> bool {
    candidates.values().any(|existing| {
        &existing.id != except && existing.profile.email.eq_ignore_ascii_case(email)
    })
}

impl RecruitmentRepository for InMemoryRepository {
    fn insert_job(&self, job: Job) -> Result<Job, RepositoryError> {
        let mut guard = lock(&self.jobs, "job")?;
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict(format!("job {}", job.id)));
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.jobs, "job")?;
        match guard.get_mut(&job.id) {
            Some(slot) => {
                *slot = job;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(lock(&self.jobs, "job")?.get(id).cloned())
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        Ok(lock(&self.jobs, "job")?.values().cloned().collect())
    }

    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, RepositoryError> {
        let mut guard = lock(&self.candidates, "candidate")?;
        if guard.contains_key(&candidate.id)
            || email_taken(&guard, &candidate.profile.email, &candidate.id)
        {
            return Err(RepositoryError::Conflict(format!(
                "candidate e-mail {}",
                candidate.profile.email
            )));
        }
        guard.insert(candidate.id.clone(), candidate.clone());
        Ok(candidate)
    }

    fn update_candidate(&self, candidate: Candidate) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.candidates, "candidate")?;
        if !guard.contains_key(&candidate.id) {
            return Err(RepositoryError::NotFound);
        }
        if email_taken(&guard, &candidate.profile.email, &candidate.id) {
            return Err(RepositoryError::Conflict(format!(
                "candidate e-mail {}",
                candidate.profile.email
            )));
        }
        guard.insert(candidate.id.clone(), candidate);
        Ok(())
    }

    fn fetch_candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(lock(&self.candidates, "candidate")?.get(id).cloned())
    }

    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(lock(&self.candidates, "candidate")?
            .values()
            .cloned()
            .collect())
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = lock(&self.applications, "application")?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict(format!(
                "application {}",
                application.id
            )));
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.applications, "application")?.get(id).cloned())
    }

    fn write_application_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<(ApplicationStatus, Application), RepositoryError> {
        let mut guard = lock(&self.applications, "application")?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let previous = record.status;
        record.status = status;
        if notes.is_some() {
            record.notes = notes;
        }
        record.updated_at = chrono::Utc::now();
        Ok((previous, record.clone()))
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.applications, "application")?
            .values()
            .cloned()
            .collect())
    }

    fn insert_interview(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = lock(&self.interviews, "interview")?;
        if guard.contains_key(&interview.id) {
            return Err(RepositoryError::Conflict(format!(
                "interview {}",
                interview.id
            )));
        }
        guard.insert(interview.id.clone(), interview.clone());
        Ok(interview)
    }

    fn update_interview(&self, interview: Interview) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.interviews, "interview")?;
        match guard.get_mut(&interview.id) {
            Some(slot) => {
                *slot = interview;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_interview(&self, id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Ok(lock(&self.interviews, "interview")?.get(id).cloned())
    }

    fn interviews(&self) -> Result<Vec<Interview>, RepositoryError> {
        Ok(lock(&self.interviews, "interview")?
            .values()
            .cloned()
            .collect())
    }
}
