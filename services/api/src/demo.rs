use crate::infra::InterviewBookingNotifier;
use clap::Args;
use regional_ats::config::{validate_interview_lead_days, DEFAULT_INTERVIEW_LEAD_DAYS};
use regional_ats::error::AppError;
use regional_ats::recruitment::{
    CandidateDraft, CandidateFilter, EmploymentType, EnglishLevel, InMemoryRepository, JobDraft,
    Location, RecruitmentService, RelocationWillingness, VisaStatus,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Days between reaching `interview` and the booked slot.
    #[arg(long)]
    pub(crate) interview_lead_days: Option<i64>,
    /// Skip moving the sample applications through the pipeline.
    #[arg(long)]
    pub(crate) skip_pipeline: bool,
    /// Print dashboard counts as JSON instead of a table.
    #[arg(long)]
    pub(crate) json: bool,
}

type DemoService =
    RecruitmentService<InMemoryRepository, InterviewBookingNotifier<InMemoryRepository>>;

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        interview_lead_days,
        skip_pipeline,
        json,
    } = args;

    let lead_days =
        validate_interview_lead_days(interview_lead_days.unwrap_or(DEFAULT_INTERVIEW_LEAD_DAYS))?;

    let repository = Arc::new(InMemoryRepository::default());
    let notifier = Arc::new(InterviewBookingNotifier::new(repository.clone(), lead_days));
    let service: DemoService = RecruitmentService::new(repository, notifier);

    println!("Regional recruitment demo");
    let jobs = [
        service.create_job(sample_job(
            "Centre Director",
            Location::MountIsa,
            true,
            EmploymentType::FullTime,
        ))?,
        service.create_job(sample_job(
            "Early Childhood Teacher",
            Location::Moranbah,
            false,
            EmploymentType::FullTime,
        ))?,
        service.create_job(sample_job(
            "Educator (Cert III)",
            Location::ChartersTowers,
            true,
            EmploymentType::Casual,
        ))?,
    ];
    for job in &jobs {
        println!(
            "- {} in {} (sponsorship {})",
            job.title,
            job.location.label(),
            if job.sponsorship_eligible { "offered" } else { "not offered" }
        );
    }

    for draft in sample_candidates() {
        service.create_candidate(draft)?;
    }

    println!("\nRanked candidates");
    let ranked = service.list_candidates(&CandidateFilter::default())?;
    for candidate in &ranked {
        let breakdown = service.score_breakdown(&candidate.id)?;
        println!(
            "- {:<18} {:>4} | {} | {}",
            candidate.profile.full_name,
            breakdown.display(),
            candidate.profile.visa_status.label(),
            candidate.profile.location
        );
        for component in &breakdown.components {
            println!(
                "    {:?}: {:.2} ({})",
                component.factor, component.points, component.notes
            );
        }
    }

    println!("\nVisa eligibility");
    for candidate in &ranked {
        for job in &jobs {
            let verdict = service.evaluate_visa(&candidate.id, Some(&job.id))?;
            println!(
                "- {} -> {}: {}",
                candidate.profile.full_name,
                job.location.label(),
                verdict.reason
            );
            for note in &verdict.considerations {
                println!("    * {note}");
            }
        }
    }

    if !skip_pipeline {
        println!("\nPipeline");
        for candidate in ranked.iter().take(2) {
            let application =
                service.create_application(jobs[0].id.clone(), candidate.id.clone(), None)?;
            for status in ["screening", "interview"] {
                service.set_application_status(&application.id, status, None)?;
            }
            println!(
                "- {} moved to interview for {}",
                candidate.profile.full_name, jobs[0].title
            );
        }
        for interview in service.list_interviews()? {
            println!(
                "  booked {:?} interview on {}",
                interview.interview_type,
                interview.scheduled_date.format("%Y-%m-%d")
            );
        }
    }

    let stats = service.dashboard()?;
    if json {
        match serde_json::to_string_pretty(&stats) {
            Ok(payload) => println!("\n{payload}"),
            Err(err) => println!("\nDashboard unavailable: {err}"),
        }
        return Ok(());
    }

    println!("\nDashboard");
    println!(
        "- {} active jobs | {} candidates | {} applications",
        stats.total_jobs, stats.total_candidates, stats.total_applications
    );
    println!(
        "- sponsorship needed: {} | not needed: {}",
        stats.visa_sponsorship.needed, stats.visa_sponsorship.not_needed
    );
    for (status, count) in stats.applications_by_status.entries() {
        println!("  {:<10} {}", status.label(), count);
    }
    for (location, count) in stats.jobs_by_location.entries() {
        println!("  {:<16} {}", location.label(), count);
    }

    Ok(())
}

fn sample_job(
    title: &str,
    location: Location,
    sponsorship_eligible: bool,
    employment_type: EmploymentType,
) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        location,
        sponsorship_eligible,
        relocation_support: sponsorship_eligible,
        housing_support: location == Location::MountIsa,
        description: format!("{title} for a community childcare centre"),
        requirements: Some(vec![
            "Working with Children Check".to_string(),
            "First Aid certificate".to_string(),
        ]),
        salary_range: None,
        employment_type,
        status: None,
    }
}

fn sample_candidates() -> Vec<CandidateDraft> {
    let base = CandidateDraft {
        full_name: String::new(),
        email: String::new(),
        phone: String::new(),
        location: String::new(),
        visa_status: VisaStatus::Citizen,
        visa_type: None,
        sponsorship_needed: false,
        childcare_cert: None,
        experience_years: Some(0),
        rural_experience: false,
        relocation_willing: RelocationWillingness::Maybe,
        housing_needed: false,
        english_level: EnglishLevel::Native,
        availability_start: None,
        salary_expectation: None,
        notes: String::new(),
    };

    vec![
        CandidateDraft {
            full_name: "Mia Thompson".to_string(),
            email: "mia.thompson@example.com".to_string(),
            location: "Mount Isa".to_string(),
            childcare_cert: Some("Diploma of Early Childhood".to_string()),
            experience_years: Some(6),
            rural_experience: true,
            relocation_willing: RelocationWillingness::Yes,
            ..base.clone()
        },
        CandidateDraft {
            full_name: "Arjun Patel".to_string(),
            email: "arjun.patel@example.com".to_string(),
            location: "Brisbane".to_string(),
            visa_status: VisaStatus::NeedsSponsorship,
            sponsorship_needed: true,
            childcare_cert: Some("Bachelor of Education".to_string()),
            experience_years: Some(4),
            english_level: EnglishLevel::Fluent,
            relocation_willing: RelocationWillingness::Yes,
            housing_needed: true,
            ..base.clone()
        },
        CandidateDraft {
            full_name: "Sofia Garcia".to_string(),
            email: "sofia.garcia@example.com".to_string(),
            location: "Townsville".to_string(),
            visa_status: VisaStatus::Temporary,
            visa_type: Some("Working Holiday (417)".to_string()),
            experience_years: Some(1),
            english_level: EnglishLevel::Good,
            ..base.clone()
        },
        CandidateDraft {
            full_name: "Liam O'Connor".to_string(),
            email: "liam.oconnor@example.com".to_string(),
            location: "Charters Towers".to_string(),
            visa_status: VisaStatus::Permanent,
            experience_years: Some(2),
            rural_experience: true,
            relocation_willing: RelocationWillingness::No,
            ..base
        },
    ]
}
