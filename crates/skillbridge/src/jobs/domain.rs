use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::users::UserId;

/// Job identifier. [`JobId::NEW`] marks a job that has not been assigned an id yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl JobId {
    pub const NEW: JobId = JobId(0);

    pub fn is_new(self) -> bool {
        self == Self::NEW
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication state of a posting. `ACTIVE` is the open, accepting-applications state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    #[default]
    #[serde(alias = "POSTED", alias = "OPEN")]
    Active,
    Closed,
}

impl JobStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Closed => "Closed",
        }
    }
}

/// Where an applicant stands on a job. Any status may follow any other; the hiring team drives
/// transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    #[serde(alias = "SELECTED")]
    Offered,
    Rejected,
}

impl ApplicationStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offered => "Offered",
            Self::Rejected => "Rejected",
        }
    }
}

/// A user's application, embedded in the job it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub applicant_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Base64 encoded resume document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    /// When the application was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_time: Option<DateTime<Utc>>,
}

impl Applicant {
    pub fn new(applicant_id: UserId) -> Self {
        Self {
            applicant_id,
            name: None,
            email: None,
            phone: None,
            website: None,
            resume: None,
            cover_letter: None,
            timestamp: None,
            application_status: ApplicationStatus::Applied,
            interview_time: None,
        }
    }
}

/// Job posting as exchanged with API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: JobId,
    pub job_title: String,
    pub company: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub package_offered: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub job_status: JobStatus,
    #[serde(default)]
    pub post_time: Option<DateTime<Utc>>,
    pub posted_by: UserId,
    #[serde(default)]
    pub applicants: Vec<Applicant>,
}

impl Job {
    /// A new, unsaved posting with the given headline fields.
    pub fn new(job_title: impl Into<String>, company: impl Into<String>, posted_by: UserId) -> Self {
        Self {
            id: JobId::NEW,
            job_title: job_title.into(),
            company: company.into(),
            about: String::new(),
            experience: String::new(),
            job_type: String::new(),
            location: String::new(),
            package_offered: 0,
            description: String::new(),
            skills_required: Vec::new(),
            job_status: JobStatus::Active,
            post_time: None,
            posted_by,
            applicants: Vec::new(),
        }
    }

    pub fn applicant(&self, applicant_id: UserId) -> Option<&Applicant> {
        self.applicants
            .iter()
            .find(|applicant| applicant.applicant_id == applicant_id)
    }
}

/// Request to move an applicant on a job to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationTransition {
    /// Job the application belongs to.
    pub id: JobId,
    pub applicant_id: UserId,
    pub application_status: ApplicationStatus,
    /// Only read when moving to [`ApplicationStatus::Interviewing`].
    #[serde(default)]
    pub interview_time: Option<DateTime<Utc>>,
}
