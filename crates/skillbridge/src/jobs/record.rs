//! Persisted form of the job aggregate and its conversion to and from the API shape.
//!
//! Field correspondence, API (`Job`) to storage (`JobRecord`):
//!
//! | `Job`             | `JobRecord`       | notes                                   |
//! |-------------------|-------------------|-----------------------------------------|
//! | `id`              | `id`              | `JobId` unwrapped to `u64`              |
//! | `job_title`       | `job_title`       |                                         |
//! | `company`         | `company`         |                                         |
//! | `about`           | `about`           |                                         |
//! | `experience`      | `experience`      |                                         |
//! | `job_type`        | `job_type`        |                                         |
//! | `location`        | `location`        |                                         |
//! | `package_offered` | `package_offered` |                                         |
//! | `description`     | `description`     |                                         |
//! | `skills_required` | `skills_required` | order preserved                         |
//! | `job_status`      | `job_status`      |                                         |
//! | `post_time`       | `post_time`       |                                         |
//! | `posted_by`       | `posted_by`       | `UserId` unwrapped to `u64`             |
//! | `applicants`      | `applicants`      | element-wise, order preserved           |
//! | (none)            | `version`         | storage only, optimistic concurrency    |
//!
//! Applicant (`Applicant`) to `ApplicantRecord`:
//!
//! | `Applicant`          | `ApplicantRecord`    | notes                        |
//! |----------------------|----------------------|------------------------------|
//! | `applicant_id`       | `applicant_id`       | `UserId` unwrapped to `u64`  |
//! | `name`               | `name`               |                              |
//! | `email`              | `email`              |                              |
//! | `phone`              | `phone`              |                              |
//! | `website`            | `website`            |                              |
//! | `resume`             | `resume`             |                              |
//! | `cover_letter`       | `cover_letter`       |                              |
//! | `timestamp`          | `submitted_at`       | renamed                      |
//! | `application_status` | `application_status` |                              |
//! | `interview_time`     | `interview_time`     |                              |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Applicant, ApplicationStatus, Job, JobId, JobStatus};
use crate::users::UserId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: u64,
    pub job_title: String,
    pub company: String,
    pub about: String,
    pub experience: String,
    pub job_type: String,
    pub location: String,
    pub package_offered: u64,
    pub description: String,
    pub skills_required: Vec<String>,
    pub job_status: JobStatus,
    pub post_time: Option<DateTime<Utc>>,
    pub posted_by: u64,
    pub applicants: Vec<ApplicantRecord>,
    /// Version the record was read at; 0 for a record that has never been saved.
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub applicant_id: u64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub resume: Option<String>,
    pub cover_letter: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub application_status: ApplicationStatus,
    pub interview_time: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn from_job(job: Job, version: u64) -> Self {
        let Job {
            id,
            job_title,
            company,
            about,
            experience,
            job_type,
            location,
            package_offered,
            description,
            skills_required,
            job_status,
            post_time,
            posted_by,
            applicants,
        } = job;

        Self {
            id: id.0,
            job_title,
            company,
            about,
            experience,
            job_type,
            location,
            package_offered,
            description,
            skills_required,
            job_status,
            post_time,
            posted_by: posted_by.0,
            applicants: applicants
                .into_iter()
                .map(ApplicantRecord::from_applicant)
                .collect(),
            version,
        }
    }

    pub fn into_job(self) -> Job {
        let Self {
            id,
            job_title,
            company,
            about,
            experience,
            job_type,
            location,
            package_offered,
            description,
            skills_required,
            job_status,
            post_time,
            posted_by,
            applicants,
            version: _,
        } = self;

        Job {
            id: JobId(id),
            job_title,
            company,
            about,
            experience,
            job_type,
            location,
            package_offered,
            description,
            skills_required,
            job_status,
            post_time,
            posted_by: UserId(posted_by),
            applicants: applicants
                .into_iter()
                .map(ApplicantRecord::into_applicant)
                .collect(),
        }
    }

    pub fn job_id(&self) -> JobId {
        JobId(self.id)
    }

    pub fn has_applicant(&self, applicant_id: UserId) -> bool {
        self.applicants
            .iter()
            .any(|applicant| applicant.applicant_id == applicant_id.0)
    }

    /// True when `applicant_id` has an entry on this job in `status`.
    pub fn has_application_in(&self, applicant_id: UserId, status: ApplicationStatus) -> bool {
        self.applicants.iter().any(|applicant| {
            applicant.applicant_id == applicant_id.0 && applicant.application_status == status
        })
    }

    pub fn is_posted_by(&self, poster: UserId) -> bool {
        self.posted_by == poster.0
    }
}

impl ApplicantRecord {
    pub fn from_applicant(applicant: Applicant) -> Self {
        let Applicant {
            applicant_id,
            name,
            email,
            phone,
            website,
            resume,
            cover_letter,
            timestamp,
            application_status,
            interview_time,
        } = applicant;

        Self {
            applicant_id: applicant_id.0,
            name,
            email,
            phone,
            website,
            resume,
            cover_letter,
            submitted_at: timestamp,
            application_status,
            interview_time,
        }
    }

    pub fn into_applicant(self) -> Applicant {
        let Self {
            applicant_id,
            name,
            email,
            phone,
            website,
            resume,
            cover_letter,
            submitted_at,
            application_status,
            interview_time,
        } = self;

        Applicant {
            applicant_id: UserId(applicant_id),
            name,
            email,
            phone,
            website,
            resume,
            cover_letter,
            timestamp: submitted_at,
            application_status,
            interview_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn full_job() -> Job {
        let applied_at = Utc.with_ymd_and_hms(2025, 6, 3, 8, 15, 0).unwrap();
        let mut applicant = Applicant::new(UserId(7));
        applicant.name = Some("Priya".to_string());
        applicant.email = Some("priya@example.com".to_string());
        applicant.phone = Some("+1 555 0100".to_string());
        applicant.website = Some("https://priya.dev".to_string());
        applicant.resume = Some("JVBERi0xLjQK".to_string());
        applicant.cover_letter = Some("I build APIs.".to_string());
        applicant.timestamp = Some(applied_at);
        applicant.application_status = ApplicationStatus::Interviewing;
        applicant.interview_time = Some(applied_at + chrono::Duration::days(3));

        Job {
            id: JobId(101),
            job_title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            about: "Payments platform".to_string(),
            experience: "3+ years".to_string(),
            job_type: "Full Time".to_string(),
            location: "Remote".to_string(),
            package_offered: 32,
            description: "Own the ledger service".to_string(),
            skills_required: vec!["Rust".to_string(), "Postgres".to_string()],
            job_status: JobStatus::Active,
            post_time: Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()),
            posted_by: UserId(42),
            applicants: vec![applicant, Applicant::new(UserId(8))],
        }
    }

    #[test]
    fn record_mapping_preserves_every_field() {
        let job = full_job();
        let record = JobRecord::from_job(job.clone(), 4);

        assert_eq!(record.id, 101);
        assert_eq!(record.posted_by, 42);
        assert_eq!(record.version, 4);
        assert_eq!(record.applicants.len(), 2);
        assert_eq!(record.applicants[0].applicant_id, 7);
        assert_eq!(record.applicants[0].submitted_at, job.applicants[0].timestamp);
        assert_eq!(record.skills_required, vec!["Rust", "Postgres"]);

        assert_eq!(record.into_job(), job);
    }

    #[test]
    fn application_queries_match_id_and_status_together() {
        let record = JobRecord::from_job(full_job(), 1);

        assert!(record.has_applicant(UserId(7)));
        assert!(!record.has_applicant(UserId(9)));
        assert!(record.has_application_in(UserId(7), ApplicationStatus::Interviewing));
        assert!(!record.has_application_in(UserId(7), ApplicationStatus::Applied));
        assert!(record.has_application_in(UserId(8), ApplicationStatus::Applied));
        assert!(record.is_posted_by(UserId(42)));
        assert!(!record.is_posted_by(UserId(7)));
    }

    #[test]
    fn api_payload_defaults_optional_fields() {
        let job: Job = serde_json::from_str(
            r#"{"job_title":"Backend Engineer","company":"Acme","posted_by":42}"#,
        )
        .expect("minimal payload");

        assert!(job.id.is_new());
        assert_eq!(job.job_status, JobStatus::Active);
        assert!(job.post_time.is_none());
        assert!(job.applicants.is_empty());

        let posted: Job = serde_json::from_str(
            r#"{"id":3,"job_title":"QA","company":"Acme","posted_by":1,"job_status":"POSTED"}"#,
        )
        .expect("alias accepted");
        assert_eq!(posted.job_status, JobStatus::Active);
    }

    #[test]
    fn selected_applications_read_as_offered() {
        let status: ApplicationStatus =
            serde_json::from_str(r#""SELECTED""#).expect("alias accepted");
        assert_eq!(status, ApplicationStatus::Offered);
        assert_eq!(
            serde_json::to_string(&status).expect("serializes"),
            r#""OFFERED""#
        );
    }
}
