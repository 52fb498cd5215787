use crate::jobs::types::job::{Job, JobStatus};

use serde::{Serialize, Deserialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub saved: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
    pub withdrawn: usize,
    pub total: usize,
    /// Share of applications that reached an interview or offer, in percent
    pub response_rate: u32
}

impl JobStats {
    pub fn from_jobs(jobs: &[Job]) -> JobStats {
        let count = |status: JobStatus| jobs.iter().filter(|j| j.status == status).count();
        let interviewing = count(JobStatus::Interviewing);
        let offer = count(JobStatus::Offer);
        let total = jobs.len();

        let response_rate = if total > 0 {
            (((interviewing + offer) as f64 / total as f64) * 100.0).round() as u32
        } else { 0 };

        JobStats {
            saved: count(JobStatus::Saved),
            applied: count(JobStatus::Applied),
            interviewing,
            offer,
            rejected: count(JobStatus::Rejected),
            withdrawn: count(JobStatus::Withdrawn),
            total,
            response_rate
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct KanbanColumn {
    pub id: JobStatus,
    pub title: &'static str,
    pub jobs: Vec<Job>
}

/// Group jobs into the six board columns, keeping their relative order
pub fn columns(jobs: &[Job]) -> Vec<KanbanColumn> {
    JobStatus::ALL.iter().map(|status| KanbanColumn {
        id: *status,
        title: status.title(),
        jobs: jobs.iter().filter(|j| j.status == *status).cloned().collect()
    }).collect()
}
