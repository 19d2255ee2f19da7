use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use regional_ats::recruitment::{
    ApplicationStatus, Interview, InterviewId, InterviewStatus, InterviewType, NotifierError,
    RecruitmentRepository, StatusChangeEvent, StatusChangeNotifier,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Books a video interview `lead_days` out whenever an application enters the
/// `interview` stage.
pub(crate) struct InterviewBookingNotifier<R> {
    repository: Arc<R>,
    lead_days: i64,
}

impl<R> InterviewBookingNotifier<R> {
    pub(crate) fn new(repository: Arc<R>, lead_days: i64) -> Self {
        Self {
            repository,
            lead_days,
        }
    }
}

impl<R> StatusChangeNotifier for InterviewBookingNotifier<R>
where
    R: RecruitmentRepository,
{
    fn status_changed(&self, event: StatusChangeEvent) -> Result<(), NotifierError> {
        if event.to != ApplicationStatus::Interview || event.from == ApplicationStatus::Interview {
            return Ok(());
        }

        let now = Utc::now();
        let scheduled_date = Duration::try_days(self.lead_days)
            .and_then(|lead| now.checked_add_signed(lead))
            .ok_or_else(|| {
                NotifierError::Rejected(format!(
                    "interview lead of {} days is out of range",
                    self.lead_days
                ))
            })?;
        let interview = Interview {
            id: InterviewId::generate(),
            candidate_id: event.candidate_id,
            job_id: event.job_id,
            interview_type: InterviewType::Video,
            status: InterviewStatus::Scheduled,
            scheduled_date,
            created_at: now,
            updated_at: now,
        };

        let booked = self
            .repository
            .insert_interview(interview)
            .map_err(|err| NotifierError::Rejected(err.to_string()))?;
        info!(
            interview_id = %booked.id,
            application_id = %event.application_id,
            scheduled_date = %booked.scheduled_date,
            "interview booked"
        );
        Ok(())
    }
}
