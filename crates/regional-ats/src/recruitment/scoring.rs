//! Suitability scoring for candidates.
//!
//! The score is a pure function of the candidate profile. Each factor
//! contributes a bounded number of points and the total is clamped to
//! `[0, 10]`. Visa status is weighed as hiring friction only; it never
//! disqualifies a candidate on its own.

use serde::{Deserialize, Serialize};

use super::domain::{CandidateProfile, EnglishLevel, RelocationWillingness, VisaStatus};

pub const MAX_SCORE: f64 = 10.0;
pub const MIN_SCORE: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Experience,
    HiringFriction,
    RuralExperience,
    EnglishProficiency,
    Relocation,
    ChildcareCertificate,
}

/// Discrete contribution to a candidate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: f64,
    pub notes: String,
}

/// Full scoring trail for a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub components: Vec<ScoreComponent>,
    pub total: f64,
}

impl ScoreBreakdown {
    /// One-decimal rendering used by list views.
    pub fn display(&self) -> String {
        display_score(self.total)
    }
}

pub fn display_score(score: f64) -> String {
    format!("{score:.1}")
}

/// Stateless rubric applied on every candidate write.
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn score(profile: &CandidateProfile) -> f64 {
        Self::breakdown(profile).total
    }

    pub fn breakdown(profile: &CandidateProfile) -> ScoreBreakdown {
        let components = vec![
            experience(profile.experience_years),
            hiring_friction(profile),
            rural_experience(profile.rural_experience),
            english(profile.english_level),
            relocation(profile.relocation_willing),
            childcare_certificate(profile.childcare_cert.as_deref()),
        ];

        let raw: f64 = components.iter().map(|component| component.points).sum();
        let total = if raw.is_finite() {
            raw.clamp(MIN_SCORE, MAX_SCORE)
        } else {
            MIN_SCORE
        };

        ScoreBreakdown { components, total }
    }
}

fn experience(years: u32) -> ScoreComponent {
    let points = match years {
        years if years >= 5 => 3.0,
        2..=4 => 2.0,
        1 => 1.0,
        _ => 0.0,
    };

    ScoreComponent {
        factor: ScoreFactor::Experience,
        points,
        notes: format!("{years} year(s) of experience"),
    }
}

fn hiring_friction(profile: &CandidateProfile) -> ScoreComponent {
    let (points, notes) = match profile.visa_status {
        status if status.has_unrestricted_work_rights() => {
            (3.0, format!("{} work rights", status.label()))
        }
        status if !profile.sponsorship_needed => (
            3.0,
            format!("{} without sponsorship needed", status.label()),
        ),
        VisaStatus::Temporary => (1.5, "temporary visa requiring sponsorship".to_string()),
        _ => (0.0, "sponsorship required".to_string()),
    };

    ScoreComponent {
        factor: ScoreFactor::HiringFriction,
        points,
        notes,
    }
}

fn rural_experience(rural: bool) -> ScoreComponent {
    ScoreComponent {
        factor: ScoreFactor::RuralExperience,
        points: if rural { 2.0 } else { 0.0 },
        notes: if rural {
            "has rural or remote experience".to_string()
        } else {
            "no rural experience".to_string()
        },
    }
}

fn english(level: EnglishLevel) -> ScoreComponent {
    let points = match level {
        EnglishLevel::Native => 2.0,
        EnglishLevel::Fluent => 1.5,
        EnglishLevel::Good => 1.0,
        EnglishLevel::Basic => 0.0,
    };

    ScoreComponent {
        factor: ScoreFactor::EnglishProficiency,
        points,
        notes: format!("english level {level:?}").to_lowercase(),
    }
}

fn relocation(willing: RelocationWillingness) -> ScoreComponent {
    let points = match willing {
        RelocationWillingness::Yes => 0.5,
        RelocationWillingness::Maybe => 0.25,
        RelocationWillingness::No => 0.0,
    };

    ScoreComponent {
        factor: ScoreFactor::Relocation,
        points,
        notes: format!("relocation willingness {willing:?}").to_lowercase(),
    }
}

fn childcare_certificate(cert: Option<&str>) -> ScoreComponent {
    match cert.map(str::trim).filter(|value| !value.is_empty()) {
        Some(cert) => ScoreComponent {
            factor: ScoreFactor::ChildcareCertificate,
            points: 0.5,
            notes: format!("holds {cert}"),
        },
        None => ScoreComponent {
            factor: ScoreFactor::ChildcareCertificate,
            points: 0.0,
            notes: "no childcare certificate".to_string(),
        },
    }
}
