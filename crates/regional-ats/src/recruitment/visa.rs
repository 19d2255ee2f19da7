use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Candidate, CandidateId, Job, JobId, RelocationWillingness, VisaStatus};

pub const SPONSORSHIP_NOT_OFFERED: &str = "ineligible: sponsorship required but not offered";

/// Structured result of a visa-eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaVerdict {
    pub candidate_id: CandidateId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub eligible: bool,
    pub reason: String,
    pub sponsorship_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsorship_compatible: Option<bool>,
    pub considerations: Vec<String>,
}

/// Pure evaluator. Total over every well-formed (candidate, job) pair.
pub struct VisaEligibilityEvaluator;

impl VisaEligibilityEvaluator {
    pub fn evaluate(candidate: &Candidate, job: Option<&Job>) -> VisaVerdict {
        let profile = &candidate.profile;
        let offered = job.map(|job| job.sponsorship_eligible);

        let (eligible, reason, sponsorship_required) = match profile.visa_status {
            status if status.has_unrestricted_work_rights() => (
                true,
                format!("eligible: {} holds unrestricted work rights", status.label()),
                false,
            ),
            VisaStatus::Temporary if !profile.sponsorship_needed => {
                let reason = match profile.visa_type.as_deref() {
                    Some(visa_type) => {
                        format!("eligible: temporary visa ({visa_type}) grants work rights")
                    }
                    None => "eligible: temporary visa grants work rights".to_string(),
                };
                (true, reason, false)
            }
            VisaStatus::Temporary => match offered {
                Some(true) => (
                    true,
                    "eligible: temporary visa holder with sponsorship offered".to_string(),
                    true,
                ),
                _ => (false, SPONSORSHIP_NOT_OFFERED.to_string(), true),
            },
            _ => match offered {
                Some(true) => (
                    true,
                    "eligible: sponsorship required and offered".to_string(),
                    true,
                ),
                _ => (false, SPONSORSHIP_NOT_OFFERED.to_string(), true),
            },
        };

        let sponsorship_compatible = if sponsorship_required { offered } else { None };
        let considerations = job
            .map(|job| relocation_considerations(candidate, job))
            .unwrap_or_default();

        VisaVerdict {
            candidate_id: candidate.id.clone(),
            job_id: job.map(|job| job.id.clone()),
            eligible,
            reason,
            sponsorship_required,
            sponsorship_compatible,
            considerations,
        }
    }
}

fn relocation_considerations(candidate: &Candidate, job: &Job) -> Vec<String> {
    let profile = &candidate.profile;
    let mut notes = Vec::new();
    let lives_locally = profile
        .location
        .to_ascii_lowercase()
        .contains(&job.location.label().to_ascii_lowercase());

    if !lives_locally {
        match profile.relocation_willing {
            RelocationWillingness::No => notes.push(format!(
                "candidate is not willing to relocate to {}",
                job.location.label()
            )),
            RelocationWillingness::Maybe => notes.push(format!(
                "candidate may relocate to {}; confirm before offer",
                job.location.label()
            )),
            RelocationWillingness::Yes => {}
        }
        if job.relocation_support {
            notes.push("relocation support offered".to_string());
        }
    }

    if profile.housing_needed && !job.housing_support {
        notes.push("candidate needs housing but the role offers no housing support".to_string());
    }

    notes
}

type VerdictKey = (CandidateId, Option<JobId>);

/// Record versions a cached verdict was computed from.
type Snapshot = (DateTime<Utc>, Option<DateTime<Utc>>);

#[derive(Debug, Clone)]
struct CachedVerdict {
    snapshot: Snapshot,
    verdict: VisaVerdict,
}

/// Verdict cache keyed by (candidate, job). An entry is only served to a
/// caller holding the same record versions (`updated_at`) it was computed
/// from, so a verdict evaluated from an older snapshot never outlives the
/// write that superseded it. Writers still invalidate eagerly.
#[derive(Debug, Default)]
pub struct VerdictCache {
    entries: RwLock<HashMap<VerdictKey, CachedVerdict>>,
}

impl VerdictCache {
    pub fn get_or_evaluate(&self, candidate: &Candidate, job: Option<&Job>) -> VisaVerdict {
        let key = (candidate.id.clone(), job.map(|job| job.id.clone()));
        let snapshot = (candidate.updated_at, job.map(|job| job.updated_at));

        if let Ok(entries) = self.entries.read() {
            if let Some(cached) = entries.get(&key) {
                if cached.snapshot == snapshot {
                    debug!(candidate_id = %candidate.id, "visa verdict served from cache");
                    return cached.verdict.clone();
                }
            }
        }

        let verdict = VisaEligibilityEvaluator::evaluate(candidate, job);
        if let Ok(mut entries) = self.entries.write() {
            let newer_cached = entries
                .get(&key)
                .is_some_and(|cached| cached.snapshot > snapshot);
            if !newer_cached {
                entries.insert(
                    key,
                    CachedVerdict {
                        snapshot,
                        verdict: verdict.clone(),
                    },
                );
            }
        }
        verdict
    }

    pub fn invalidate_candidate(&self, candidate_id: &CandidateId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|(cached, _), _| cached != candidate_id);
        }
    }

    pub fn invalidate_job(&self, job_id: &JobId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|(_, cached), _| cached.as_ref() != Some(job_id));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
