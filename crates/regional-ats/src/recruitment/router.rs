use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{
    ApplicationId, CandidateId, InterviewId, InterviewStatus, InterviewType, JobId, JobStatus,
};
use super::intake::{CandidateDraft, JobDraft};
use super::repository::{RecruitmentRepository, RepositoryError, StatusChangeNotifier};
use super::service::{ApplicationFilter, CandidateFilter, RecruitmentError, RecruitmentService};

type SharedService<R, N> = Arc<RecruitmentService<R, N>>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JobListQuery {
    status: Option<JobStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VisaQuery {
    job_id: Option<JobId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationRequest {
    job_id: JobId,
    candidate_id: CandidateId,
    #[serde(default)]
    cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    status: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkUpdateRequest {
    application_ids: Vec<ApplicationId>,
    status: String,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterviewRequest {
    candidate_id: CandidateId,
    job_id: JobId,
    #[serde(rename = "type")]
    interview_type: InterviewType,
    scheduled_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterviewStatusRequest {
    status: InterviewStatus,
}

/// Router exposing the recruitment API under `/api`.
pub fn recruitment_router<R, N>(service: SharedService<R, N>) -> Router
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    Router::new()
        .route(
            "/api/jobs",
            get(list_jobs_handler::<R, N>).post(create_job_handler::<R, N>),
        )
        .route(
            "/api/jobs/:job_id",
            get(get_job_handler::<R, N>).put(update_job_handler::<R, N>),
        )
        .route(
            "/api/candidates",
            get(list_candidates_handler::<R, N>).post(create_candidate_handler::<R, N>),
        )
        .route(
            "/api/candidates/:candidate_id",
            get(get_candidate_handler::<R, N>).put(update_candidate_handler::<R, N>),
        )
        .route(
            "/api/candidates/:candidate_id/score",
            get(score_breakdown_handler::<R, N>),
        )
        .route(
            "/api/candidates/:candidate_id/visa-evaluation",
            get(visa_evaluation_handler::<R, N>),
        )
        .route(
            "/api/applications",
            get(list_applications_handler::<R, N>).post(create_application_handler::<R, N>),
        )
        .route(
            "/api/applications/bulk-update",
            post(bulk_update_handler::<R, N>),
        )
        .route(
            "/api/applications/:application_id",
            put(update_application_handler::<R, N>),
        )
        .route(
            "/api/interviews",
            get(list_interviews_handler::<R, N>).post(schedule_interview_handler::<R, N>),
        )
        .route(
            "/api/interviews/:interview_id",
            put(update_interview_handler::<R, N>),
        )
        .route("/api/dashboard/stats", get(dashboard_handler::<R, N>))
        .with_state(service)
}

/// Map service errors onto HTTP status codes with a `{"error": ..}` body.
pub(crate) fn error_response(err: RecruitmentError) -> Response {
    let status = match &err {
        RecruitmentError::Validation(_) | RecruitmentError::InvalidStatus(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RecruitmentError::NotFound(_)
        | RecruitmentError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RecruitmentError::Conflict(_)
        | RecruitmentError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
        RecruitmentError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "repository unavailable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, RecruitmentError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_jobs_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(query): Query<JobListQuery>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.list_jobs(query.status))
}

pub(crate) async fn create_job_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::CREATED, service.create_job(draft))
}

pub(crate) async fn get_job_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.get_job(&JobId(job_id)))
}

pub(crate) async fn update_job_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(job_id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.update_job(&JobId(job_id), draft))
}

pub(crate) async fn list_candidates_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(filter): Query<CandidateFilter>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.list_candidates(&filter))
}

pub(crate) async fn create_candidate_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(draft): Json<CandidateDraft>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::CREATED, service.create_candidate(draft))
}

pub(crate) async fn get_candidate_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.get_candidate(&CandidateId(candidate_id)),
    )
}

pub(crate) async fn update_candidate_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(candidate_id): Path<String>,
    Json(draft): Json<CandidateDraft>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.update_candidate(&CandidateId(candidate_id), draft),
    )
}

pub(crate) async fn score_breakdown_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.score_breakdown(&CandidateId(candidate_id)),
    )
}

pub(crate) async fn visa_evaluation_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(candidate_id): Path<String>,
    Query(query): Query<VisaQuery>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.evaluate_visa(&CandidateId(candidate_id), query.job_id.as_ref()),
    )
}

pub(crate) async fn list_applications_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.list_applications(&filter))
}

pub(crate) async fn create_application_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(request): Json<ApplicationRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    let ApplicationRequest {
        job_id,
        candidate_id,
        cover_letter,
    } = request;
    respond(
        StatusCode::CREATED,
        service.create_application(job_id, candidate_id, cover_letter),
    )
}

pub(crate) async fn update_application_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(application_id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.set_application_status(
            &ApplicationId(application_id),
            &request.status,
            request.notes,
        ),
    )
}

pub(crate) async fn bulk_update_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(request): Json<BulkUpdateRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    match service.bulk_set_application_status(
        request.application_ids,
        &request.status,
        request.notes,
    ) {
        Ok(outcome) => {
            let status = if outcome.is_partial() {
                StatusCode::MULTI_STATUS
            } else {
                StatusCode::OK
            };
            (status, Json(outcome)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_interviews_handler<R, N>(
    State(service): State<SharedService<R, N>>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.list_interviews())
}

pub(crate) async fn schedule_interview_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Json(request): Json<InterviewRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::CREATED,
        service.schedule_interview(
            request.candidate_id,
            request.job_id,
            request.interview_type,
            request.scheduled_date,
        ),
    )
}

pub(crate) async fn update_interview_handler<R, N>(
    State(service): State<SharedService<R, N>>,
    Path(interview_id): Path<String>,
    Json(request): Json<InterviewStatusRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(
        StatusCode::OK,
        service.set_interview_status(&InterviewId(interview_id), request.status),
    )
}

pub(crate) async fn dashboard_handler<R, N>(
    State(service): State<SharedService<R, N>>,
) -> Response
where
    R: RecruitmentRepository + 'static,
    N: StatusChangeNotifier + 'static,
{
    respond(StatusCode::OK, service.dashboard())
}
