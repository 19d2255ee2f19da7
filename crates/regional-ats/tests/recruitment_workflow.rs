//! Integration scenarios for the recruitment workflow.
//!
//! Scenarios drive the public service facade and HTTP router end to end:
//! candidates are scored on intake, checked against sponsoring and
//! non-sponsoring roles, moved through the pipeline and summarised on the
//! dashboard.

mod common {
    use std::sync::{Arc, Mutex};

    use regional_ats::recruitment::{
        CandidateDraft, EmploymentType, EnglishLevel, InMemoryRepository, JobDraft, Location,
        NotifierError, RecruitmentService, RelocationWillingness, StatusChangeEvent,
        StatusChangeNotifier, VisaStatus,
    };

    pub(super) fn job_draft(title: &str, location: Location, sponsorship: bool) -> JobDraft {
        JobDraft {
            title: title.to_string(),
            location,
            sponsorship_eligible: sponsorship,
            relocation_support: true,
            housing_support: false,
            description: "Community long day care centre".to_string(),
            requirements: Some(vec!["Working with Children Check".to_string()]),
            salary_range: None,
            employment_type: EmploymentType::FullTime,
            status: None,
        }
    }

    pub(super) fn candidate_draft(email: &str, visa_status: VisaStatus) -> CandidateDraft {
        let sponsorship_needed = visa_status == VisaStatus::NeedsSponsorship;
        CandidateDraft {
            full_name: "Jordan Blake".to_string(),
            email: email.to_string(),
            phone: String::new(),
            location: "Cairns".to_string(),
            visa_status,
            visa_type: None,
            sponsorship_needed,
            childcare_cert: Some("Diploma".to_string()),
            experience_years: Some(5),
            rural_experience: true,
            relocation_willing: RelocationWillingness::Yes,
            housing_needed: true,
            english_level: EnglishLevel::Native,
            availability_start: Some("2025-12-01".to_string()),
            salary_expectation: None,
            notes: String::new(),
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryNotifier {
        events: Mutex<Vec<StatusChangeEvent>>,
    }

    impl MemoryNotifier {
        pub(super) fn events(&self) -> Vec<StatusChangeEvent> {
            self.events.lock().expect("lock").clone()
        }
    }

    impl StatusChangeNotifier for MemoryNotifier {
        fn status_changed(&self, event: StatusChangeEvent) -> Result<(), NotifierError> {
            self.events.lock().expect("lock").push(event);
            Ok(())
        }
    }

    pub(super) type Service = RecruitmentService<InMemoryRepository, MemoryNotifier>;

    pub(super) fn build_service() -> (Service, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::default());
        let service = RecruitmentService::new(
            Arc::new(InMemoryRepository::default()),
            notifier.clone(),
        );
        (service, notifier)
    }
}

mod hiring {
    use super::common::*;
    use regional_ats::recruitment::{
        ApplicationStatus, CandidateFilter, Location, RecruitmentError, VisaStatus,
    };

    #[test]
    fn sponsored_candidate_moves_from_intake_to_hire() {
        let (service, notifier) = build_service();
        let sponsoring = service
            .create_job(job_draft("Centre Director", Location::MountIsa, true))
            .expect("job stored");
        let local_only = service
            .create_job(job_draft("Educator", Location::Moranbah, false))
            .expect("job stored");

        let candidate = service
            .create_candidate(candidate_draft(
                "jordan@example.com",
                VisaStatus::NeedsSponsorship,
            ))
            .expect("candidate stored");
        assert_eq!(candidate.score(), 8.0);

        let blocked = service
            .evaluate_visa(&candidate.id, Some(&local_only.id))
            .expect("verdict");
        assert!(!blocked.eligible);
        assert_eq!(blocked.sponsorship_compatible, Some(false));

        let cleared = service
            .evaluate_visa(&candidate.id, Some(&sponsoring.id))
            .expect("verdict");
        assert!(cleared.eligible);
        assert!(cleared
            .considerations
            .iter()
            .any(|note| note.contains("housing")));

        let application = service
            .create_application(sponsoring.id.clone(), candidate.id.clone(), None)
            .expect("application stored");
        for status in ["screening", "interview", "offer", "hired"] {
            service
                .set_application_status(&application.id, status, None)
                .expect("status accepted");
        }

        let moves: Vec<(ApplicationStatus, ApplicationStatus)> = notifier
            .events()
            .into_iter()
            .map(|event| (event.from, event.to))
            .collect();
        assert_eq!(
            moves,
            vec![
                (ApplicationStatus::New, ApplicationStatus::Screening),
                (ApplicationStatus::Screening, ApplicationStatus::Interview),
                (ApplicationStatus::Interview, ApplicationStatus::Offer),
                (ApplicationStatus::Offer, ApplicationStatus::Hired),
            ]
        );

        let stats = service.dashboard().expect("stats");
        assert_eq!(stats.total_jobs, 2);
        assert_eq!(stats.total_candidates, 1);
        assert_eq!(stats.applications_by_status.get(ApplicationStatus::Hired), 1);
        assert_eq!(stats.visa_sponsorship.needed, 1);
    }

    #[test]
    fn ranking_puts_unrestricted_candidates_first() {
        let (service, _) = build_service();
        service
            .create_candidate(candidate_draft(
                "needs@example.com",
                VisaStatus::NeedsSponsorship,
            ))
            .expect("stored");
        service
            .create_candidate(candidate_draft("citizen@example.com", VisaStatus::Citizen))
            .expect("stored");

        let ranked = service
            .list_candidates(&CandidateFilter::default())
            .expect("listing");
        assert_eq!(ranked[0].profile.email, "citizen@example.com");
        assert_eq!(ranked[0].score(), 10.0);
        assert!(ranked[1].score() < ranked[0].score());
    }

    #[test]
    fn unknown_status_is_rejected_before_any_write() {
        let (service, notifier) = build_service();
        let job = service
            .create_job(job_draft("Cook", Location::ChartersTowers, false))
            .expect("job");
        let candidate = service
            .create_candidate(candidate_draft("cook@example.com", VisaStatus::Permanent))
            .expect("candidate");
        let application = service
            .create_application(job.id, candidate.id, None)
            .expect("application");

        let result = service.bulk_set_application_status(vec![application.id], "archived", None);
        assert!(matches!(result, Err(RecruitmentError::InvalidStatus(_))));
        assert!(notifier.events().is_empty());
    }
}

mod http {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::common::*;
    use regional_ats::recruitment::{recruitment_router, Location, VisaStatus};

    #[tokio::test]
    async fn score_breakdown_and_dashboard_are_served() {
        let (service, _) = build_service();
        let candidate = service
            .create_candidate(candidate_draft("jordan@example.com", VisaStatus::Citizen))
            .expect("candidate");
        service
            .create_job(job_draft("Educator", Location::Moranbah, false))
            .expect("job");
        let router = recruitment_router(Arc::new(service));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/candidates/{}/score", candidate.id))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let breakdown: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(breakdown["total"], json!(10.0));
        assert_eq!(breakdown["components"].as_array().map(Vec::len), Some(6));

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/dashboard/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let stats: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(stats["jobs_by_location"]["Moranbah"], json!(1));
        assert_eq!(stats["visa_sponsorship"]["false"], json!(1));
    }
}
