//! Job application records and the payloads used to create / modify them

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Pipeline stage of an application. Each status is one kanban column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn
}

impl JobStatus {
    /// Board order, left to right
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Saved,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Withdrawn
    ];

    /// Column heading shown on the board
    pub fn title(&self) -> &'static str {
        match self {
            JobStatus::Saved => "Saved",
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
            JobStatus::Withdrawn => "Withdrawn",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            JobStatus::Saved => write!(f, "saved"),
            JobStatus::Applied => write!(f, "applied"),
            JobStatus::Interviewing => write!(f, "interviewing"),
            JobStatus::Offer => write!(f, "offer"),
            JobStatus::Rejected => write!(f, "rejected"),
            JobStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL.into_iter()
            .find(|status| status.to_string() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown job status `{s}`"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "work_type", rename_all = "lowercase")]
pub enum WorkType {
    Remote,
    #[default]
    Hybrid,
    #[serde(rename = "in-person", alias = "onsite")]
    #[sqlx(rename = "in-person")]
    InPerson
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WorkType::Remote => write!(f, "remote"),
            WorkType::Hybrid => write!(f, "hybrid"),
            WorkType::InPerson => write!(f, "in-person"),
        }
    }
}

macro_rules! update_if_not_none {
    ($base: ident, $($property: ident),+) => {
        $(if let Some(value) = $property {
            $base.$property = value;
        })+
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub company: String,
    pub title: String,
    pub link: Option<String>,
    pub company_logo: Option<String>,
    pub company_domain: Option<String>,
    pub expected_salary: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<WorkType>,
    pub date_applied: Option<NaiveDateTime>,
    pub status: JobStatus,
    pub resume_used: Option<String>,
    pub pay_range: Option<String>,
    pub current_salary: Option<String>,
    pub offer_amount: Option<String>,
    pub notes: Option<String>,
    pub priority: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime
}

impl Job {
    /// Build a record that only exists locally (never sent to the database)
    pub fn from_form(id: i32, form: JobForm, now: NaiveDateTime) -> Job {
        let form = form.normalized();
        Job {
            id,
            company: form.company,
            title: form.title,
            link: form.link,
            company_logo: None,
            company_domain: None,
            expected_salary: form.expected_salary,
            location: form.location,
            work_type: Some(form.work_type.unwrap_or_default()),
            date_applied: form.date_applied.map(start_of_day),
            status: form.status,
            resume_used: form.resume_used,
            pay_range: form.pay_range,
            current_salary: None,
            offer_amount: None,
            notes: form.notes,
            priority: Some(form.priority.unwrap_or(0)),
            created_at: now,
            updated_at: now
        }
    }

    /// Date used for sorting and date filters
    pub fn effective_date(&self) -> NaiveDateTime {
        self.date_applied.unwrap_or(self.created_at)
    }

    /// Merge the fields present in `patch`. Does not touch `updated_at`
    pub fn apply_patch(&mut self, patch: JobPatch) {
        let JobPatch {
            company, title, link, expected_salary, location, work_type, date_applied,
            status, resume_used, pay_range, current_salary, offer_amount, notes, priority
        } = patch;

        update_if_not_none!(self, company, title, link, expected_salary, location, work_type,
            status, resume_used, pay_range, current_salary, offer_amount, notes, priority);

        if let Some(date_applied) = date_applied {
            self.date_applied = date_applied.map(start_of_day);
        }
    }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Payload for creating a job
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobForm {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_type: Option<WorkType>,
    #[serde(default)]
    pub date_applied: Option<NaiveDate>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub resume_used: Option<String>,
    #[serde(default)]
    pub pay_range: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<i32>
}

impl JobForm {
    /// Empty optional text fields are stored as null
    pub fn normalized(mut self) -> JobForm {
        self.link = non_blank(self.link);
        self.expected_salary = non_blank(self.expected_salary);
        self.location = non_blank(self.location);
        self.resume_used = non_blank(self.resume_used);
        self.pay_range = non_blank(self.pay_range);
        self.notes = non_blank(self.notes);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Partial update. Nullable columns are double options: `None` leaves the
/// field as is, `Some(None)` clears it
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub expected_salary: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub work_type: Option<Option<WorkType>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub date_applied: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub resume_used: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub pay_range: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub current_salary: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub offer_amount: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub priority: Option<Option<i32>>
}

impl JobPatch {
    pub fn status(status: JobStatus) -> JobPatch {
        JobPatch { status: Some(status), ..Default::default() }
    }
}

// Present-but-null must stay distinguishable from absent
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: i32,
    pub job_id: i32,
    pub interview_number: i32,
    pub person: Option<String>,
    pub date_time: Option<NaiveDateTime>,
    pub completed: Option<bool>,
    pub follow_up_sent: Option<bool>,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub job_id: i32,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub created_at: NaiveDateTime
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobWithInterviews {
    #[serde(flatten)]
    pub job: Job,
    pub interviews: Vec<Interview>
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        let now = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap().and_hms_opt(12, 0, 0).unwrap();
        Job::from_form(1001, JobForm {
            company: "Monzo".to_string(),
            title: "Backend Engineer".to_string(),
            link: Some("".to_string()),
            notes: Some("Referral".to_string()),
            ..Default::default()
        }, now)
    }

    #[test]
    fn from_form_defaults() {
        let job = job();
        assert_eq!(job.link, None, "Blank link stored as null");
        assert_eq!(job.work_type, Some(WorkType::Hybrid), "Work type defaults to hybrid");
        assert_eq!(job.status, JobStatus::Saved, "Status defaults to saved");
        assert_eq!(job.priority, Some(0));
        assert_eq!(job.effective_date(), job.created_at, "No date applied falls back to created_at");
    }

    #[test]
    fn patch_absent_vs_null() {
        let mut job = job();
        let patch: JobPatch = serde_json::from_str(r#"{"notes": null, "status": "offer"}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.location, None);

        job.location = Some("London".to_string());
        job.apply_patch(patch);
        assert_eq!(job.notes, None, "Explicit null clears the field");
        assert_eq!(job.location, Some("London".to_string()), "Absent field left untouched");
        assert_eq!(job.status, JobStatus::Offer);
    }

    #[test]
    fn status_wire_format() {
        assert_eq!(serde_json::to_string(&JobStatus::Interviewing).unwrap(), "\"interviewing\"");
        assert_eq!(serde_json::to_string(&WorkType::InPerson).unwrap(), "\"in-person\"");
        assert_eq!(serde_json::from_str::<WorkType>("\"onsite\"").unwrap(), WorkType::InPerson);
        assert_eq!("Offer".parse::<JobStatus>(), Ok(JobStatus::Offer));
        assert!("hired".parse::<JobStatus>().is_err());
    }

    #[test]
    fn status_patch_serializes_only_status() {
        let body = serde_json::to_string(&JobPatch::status(JobStatus::Rejected)).unwrap();
        assert_eq!(body, r#"{"status":"rejected"}"#);
    }
}
