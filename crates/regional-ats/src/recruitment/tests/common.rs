use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::recruitment::domain::{
    Application, ApplicationId, ApplicationStatus, Candidate, CandidateId, CandidateProfile,
    EmploymentType, EnglishLevel, Interview, InterviewId, Job, JobId, JobStatus, Location,
    RelocationWillingness, VisaStatus,
};
use crate::recruitment::intake::{CandidateDraft, JobDraft};
use crate::recruitment::repository::{
    InMemoryRepository, NotifierError, RecruitmentRepository, RepositoryError, StatusChangeEvent,
    StatusChangeNotifier,
};
use crate::recruitment::{recruitment_router, RecruitmentService};

pub(super) fn profile() -> CandidateProfile {
    CandidateProfile {
        full_name: "Aroha Ngata".to_string(),
        email: "aroha@example.com".to_string(),
        phone: "0412345678".to_string(),
        location: "Brisbane".to_string(),
        visa_status: VisaStatus::Citizen,
        visa_type: None,
        sponsorship_needed: false,
        childcare_cert: None,
        experience_years: 0,
        rural_experience: false,
        relocation_willing: RelocationWillingness::Maybe,
        housing_needed: false,
        english_level: EnglishLevel::Basic,
        availability_start: None,
        salary_expectation: None,
        notes: String::new(),
    }
}

pub(super) fn candidate_with(profile: CandidateProfile) -> Candidate {
    Candidate::from_profile(CandidateId::generate(), profile, Utc::now())
}

pub(super) fn job(location: Location, sponsorship_eligible: bool) -> Job {
    let now = Utc::now();
    Job {
        id: JobId::generate(),
        title: "Early Childhood Educator".to_string(),
        location,
        sponsorship_eligible,
        relocation_support: true,
        housing_support: false,
        description: "Lead a toddler room in a community centre.".to_string(),
        requirements: vec!["Diploma in Early Childhood Education".to_string()],
        salary_range: Some("$65,000 - $75,000".to_string()),
        employment_type: EmploymentType::FullTime,
        status: JobStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

pub(super) fn application(job_id: &JobId, status: ApplicationStatus) -> Application {
    let now = Utc::now();
    Application {
        id: ApplicationId::generate(),
        job_id: job_id.clone(),
        candidate_id: CandidateId::generate(),
        cover_letter: None,
        status,
        notes: None,
        applied_at: now,
        updated_at: now,
    }
}

pub(super) fn job_draft(location: Location, sponsorship_eligible: bool) -> JobDraft {
    JobDraft {
        title: "Room Leader".to_string(),
        location,
        sponsorship_eligible,
        relocation_support: true,
        housing_support: true,
        description: "Lead the kindy room.".to_string(),
        requirements: Some(vec![
            "Diploma in Early Childhood Education".to_string(),
            "Working with Children Check".to_string(),
        ]),
        salary_range: Some("$70,000".to_string()),
        employment_type: EmploymentType::FullTime,
        status: None,
    }
}

pub(super) fn candidate_draft(email: &str) -> CandidateDraft {
    CandidateDraft {
        full_name: "Priya Raman".to_string(),
        email: email.to_string(),
        phone: "0498765432".to_string(),
        location: "Townsville".to_string(),
        visa_status: VisaStatus::Temporary,
        visa_type: Some("Working Holiday".to_string()),
        sponsorship_needed: true,
        childcare_cert: Some("Certificate III".to_string()),
        experience_years: Some(3),
        rural_experience: true,
        relocation_willing: RelocationWillingness::Yes,
        housing_needed: true,
        english_level: EnglishLevel::Fluent,
        availability_start: Some("2025-11-03".to_string()),
        salary_expectation: Some(70000),
        notes: "Referred by Moranbah centre".to_string(),
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingNotifier {
    events: Arc<Mutex<Vec<StatusChangeEvent>>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<StatusChangeEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl StatusChangeNotifier for RecordingNotifier {
    fn status_changed(&self, event: StatusChangeEvent) -> Result<(), NotifierError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl StatusChangeNotifier for FailingNotifier {
    fn status_changed(&self, _event: StatusChangeEvent) -> Result<(), NotifierError> {
        Err(NotifierError::Transport("smtp offline".to_string()))
    }
}

pub(super) type TestService = RecruitmentService<InMemoryRepository, RecordingNotifier>;

pub(super) fn build_service() -> (
    TestService,
    Arc<InMemoryRepository>,
    Arc<RecordingNotifier>,
) {
    let repository = Arc::new(InMemoryRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = RecruitmentService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

pub(super) fn router_with_service(service: TestService) -> axum::Router {
    recruitment_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl RecruitmentRepository for UnavailableRepository {
    fn insert_job(&self, _job: Job) -> Result<Job, RepositoryError> {
        offline()
    }

    fn update_job(&self, _job: Job) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch_job(&self, _id: &JobId) -> Result<Option<Job>, RepositoryError> {
        offline()
    }

    fn jobs(&self) -> Result<Vec<Job>, RepositoryError> {
        offline()
    }

    fn insert_candidate(&self, _candidate: Candidate) -> Result<Candidate, RepositoryError> {
        offline()
    }

    fn update_candidate(&self, _candidate: Candidate) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch_candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        offline()
    }

    fn candidates(&self) -> Result<Vec<Candidate>, RepositoryError> {
        offline()
    }

    fn insert_application(
        &self,
        _application: Application,
    ) -> Result<Application, RepositoryError> {
        offline()
    }

    fn fetch_application(
        &self,
        _id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        offline()
    }

    fn write_application_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
        _notes: Option<String>,
    ) -> Result<(ApplicationStatus, Application), RepositoryError> {
        offline()
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        offline()
    }

    fn insert_interview(&self, _interview: Interview) -> Result<Interview, RepositoryError> {
        offline()
    }

    fn update_interview(&self, _interview: Interview) -> Result<(), RepositoryError> {
        offline()
    }

    fn fetch_interview(&self, _id: &InterviewId) -> Result<Option<Interview>, RepositoryError> {
        offline()
    }

    fn interviews(&self) -> Result<Vec<Interview>, RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
