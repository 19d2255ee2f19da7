use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::domain::{Application, ApplicationStatus, Candidate, Job, JobStatus, Location};

/// Summary counts for the recruitment dashboard. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub total_candidates: usize,
    pub total_applications: usize,
    pub visa_sponsorship: SponsorshipCounts,
    pub applications_by_status: StatusCounts,
    pub jobs_by_location: LocationCounts,
}

/// Candidates split by whether they need sponsorship, keyed `"true"`/`"false"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SponsorshipCounts {
    pub needed: usize,
    pub not_needed: usize,
}

impl Serialize for SponsorshipCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("true", &self.needed)?;
        map.serialize_entry("false", &self.not_needed)?;
        map.end()
    }
}

/// Application counts for all six statuses in pipeline order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts([usize; 6]);

impl StatusCounts {
    pub fn get(&self, status: ApplicationStatus) -> usize {
        self.0[status.slot()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (ApplicationStatus, usize)> + '_ {
        ApplicationStatus::ordered()
            .into_iter()
            .map(|status| (status, self.get(status)))
    }
}

impl Serialize for StatusCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (status, count) in self.entries() {
            map.serialize_entry(status.label(), &count)?;
        }
        map.end()
    }
}

/// Job counts per regional town in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationCounts([usize; 3]);

impl LocationCounts {
    pub fn get(&self, location: Location) -> usize {
        self.0[location.slot()]
    }

    pub fn entries(&self) -> impl Iterator<Item = (Location, usize)> + '_ {
        Location::ordered()
            .into_iter()
            .map(|location| (location, self.get(location)))
    }
}

impl Serialize for LocationCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (location, count) in self.entries() {
            map.serialize_entry(location.label(), &count)?;
        }
        map.end()
    }
}

pub struct DashboardAggregator;

impl DashboardAggregator {
    /// Single pass over each collection. `total_jobs` counts active postings
    /// while `jobs_by_location` counts every posting.
    pub fn aggregate(
        jobs: &[Job],
        candidates: &[Candidate],
        applications: &[Application],
    ) -> DashboardStats {
        let mut jobs_by_location = LocationCounts::default();
        let mut total_jobs = 0;
        for job in jobs {
            jobs_by_location.0[job.location.slot()] += 1;
            if job.status == JobStatus::Active {
                total_jobs += 1;
            }
        }

        let mut visa_sponsorship = SponsorshipCounts::default();
        for candidate in candidates {
            if candidate.profile.sponsorship_needed {
                visa_sponsorship.needed += 1;
            } else {
                visa_sponsorship.not_needed += 1;
            }
        }

        let mut applications_by_status = StatusCounts::default();
        for application in applications {
            applications_by_status.0[application.status.slot()] += 1;
        }

        DashboardStats {
            total_jobs,
            total_candidates: candidates.len(),
            total_applications: applications.len(),
            visa_sponsorship,
            applications_by_status,
            jobs_by_location,
        }
    }
}
