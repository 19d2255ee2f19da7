use crate::cli::ServeArgs;
use crate::infra::{AppState, InterviewBookingNotifier};
use crate::routes::with_recruitment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use regional_ats::config::{validate_interview_lead_days, AppConfig};
use regional_ats::error::AppError;
use regional_ats::recruitment::{InMemoryRepository, RecruitmentService};
use regional_ats::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(days) = args.interview_lead_days.take() {
        config.recruitment.interview_lead_days = validate_interview_lead_days(days)?;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryRepository::default());
    let notifier = Arc::new(InterviewBookingNotifier::new(
        repository.clone(),
        config.recruitment.interview_lead_days,
    ));
    let service = Arc::new(RecruitmentService::new(repository, notifier));

    let app = with_recruitment_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        interview_lead_days = config.recruitment.interview_lead_days,
        "regional recruitment tracker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
