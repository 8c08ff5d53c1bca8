use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Applicant, ApplicationStatus, ApplicationTransition, Job, JobId, JobStatus,
};
use super::record::{ApplicantRecord, JobRecord};
use super::repository::{JobRepository, RepositoryError};
use crate::clock::{Clock, SystemClock};
use crate::email::{template, EmailDispatcher};
use crate::notifications::{NotificationDispatcher, NotificationError, NotificationRequest};
use crate::sequence::{SequenceError, SequenceGenerator};
use crate::users::{DirectoryError, UserDirectory, UserId};

pub const JOB_SEQUENCE: &str = "jobs";

/// Result of a side effect whose failure does not fail the surrounding operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered,
    Failed { reason: String },
}

impl DispatchOutcome {
    fn failed(err: impl std::fmt::Display) -> Self {
        Self::Failed {
            reason: err.to_string(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Outcome of a successful application: the stored job plus how the confirmation email fared.
#[derive(Debug, Clone)]
pub struct ApplicationReceipt {
    pub job: Job,
    pub email: DispatchOutcome,
}

/// Outcome of an application status change.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub job: Job,
    /// Applicant entries that matched the transition.
    pub matched: usize,
    /// One entry per interview notification attempted.
    pub notifications: Vec<DispatchOutcome>,
}

/// Job lifecycle service: posting, applying, and moving applicants through the pipeline.
pub struct JobService<R, U, N, E> {
    jobs: Arc<R>,
    users: Arc<U>,
    notifications: Arc<N>,
    email: Arc<E>,
    sequence: Arc<dyn SequenceGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R, U, N, E> JobService<R, U, N, E>
where
    R: JobRepository + 'static,
    U: UserDirectory + 'static,
    N: NotificationDispatcher + 'static,
    E: EmailDispatcher + 'static,
{
    pub fn new(
        jobs: Arc<R>,
        users: Arc<U>,
        notifications: Arc<N>,
        email: Arc<E>,
        sequence: Arc<dyn SequenceGenerator>,
    ) -> Self {
        Self {
            jobs,
            users,
            notifications,
            email,
            sequence,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a job (id 0) or replace an existing one.
    ///
    /// Creating assigns an id from the `jobs` sequence, stamps the post time, and notifies the
    /// poster; a notification failure aborts the post before anything is stored. Updating
    /// re-stamps the post time when the stored job is still a draft or the update closes it, and
    /// otherwise keeps the stored one if the update leaves it out. Applicants are owned by
    /// [`apply_job`](Self::apply_job) and [`change_app_status`](Self::change_app_status), so an
    /// update keeps the stored list whatever the caller sends.
    pub fn post_job(&self, mut job: Job) -> Result<Job, JobServiceError> {
        let now = self.clock.now();

        let (version, applicants) = if job.id.is_new() {
            job.id = JobId(self.sequence.next_id(JOB_SEQUENCE)?);
            job.post_time = Some(now);
            self.notifications
                .send(NotificationRequest {
                    action: "Job Posted".to_string(),
                    message: format!(
                        "Job Posted Successfully for {} at {}",
                        job.job_title, job.company
                    ),
                    user_id: job.posted_by,
                    route: format!("/posted-jobs/{}", job.id),
                })
                .map_err(JobServiceError::Notification)?;
            (0, None)
        } else {
            let stored = self.load(job.id)?;
            if stored.job_status == JobStatus::Draft || job.job_status == JobStatus::Closed {
                job.post_time = Some(now);
            } else if job.post_time.is_none() {
                job.post_time = stored.post_time;
            }
            (stored.version, Some(stored.applicants))
        };

        let mut record = JobRecord::from_job(job, version);
        if let Some(applicants) = applicants {
            record.applicants = applicants;
        }
        let saved = self.jobs.save(record)?;
        info!(
            job_id = saved.id,
            posted_by = saved.posted_by,
            status = saved.job_status.label(),
            "job saved"
        );
        Ok(saved.into_job())
    }

    pub fn get_all_jobs(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(into_jobs(self.jobs.find_all()?))
    }

    pub fn get_job(&self, id: JobId) -> Result<Job, JobServiceError> {
        Ok(self.load(id)?.into_job())
    }

    /// Add `applicant` to a job and send them a confirmation email.
    ///
    /// The application is stored before the user lookup, so a missing user surfaces as
    /// [`JobServiceError::UserNotFound`] after the job has already been saved. Email failures
    /// only show up in the receipt.
    pub fn apply_job(
        &self,
        job_id: JobId,
        mut applicant: Applicant,
    ) -> Result<ApplicationReceipt, JobServiceError> {
        let mut record = self.load(job_id)?;
        let applicant_id = applicant.applicant_id;
        if record.has_applicant(applicant_id) {
            return Err(JobServiceError::AlreadyApplied {
                job_id,
                applicant_id,
            });
        }

        applicant.application_status = ApplicationStatus::Applied;
        applicant.timestamp = Some(self.clock.now());
        record
            .applicants
            .push(ApplicantRecord::from_applicant(applicant));
        let saved = self.jobs.save(record)?;
        info!(job_id = %job_id, applicant_id = %applicant_id, "application received");

        let user = self
            .users
            .find(applicant_id)?
            .ok_or(JobServiceError::UserNotFound(applicant_id))?;

        let content = template::application_confirmation(&user.name, &saved.job_title);
        let email = match self
            .email
            .send_html(&user.email, &content.subject, &content.html_body)
        {
            Ok(()) => DispatchOutcome::Delivered,
            Err(err) => {
                warn!(
                    job_id = %job_id,
                    applicant_id = %applicant_id,
                    error = %err,
                    "application confirmation email not sent"
                );
                DispatchOutcome::failed(err)
            }
        };

        Ok(ApplicationReceipt {
            job: saved.into_job(),
            email,
        })
    }

    /// Jobs on which `applicant_id` currently has an application in `status`.
    pub fn get_history(
        &self,
        applicant_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<Job>, JobServiceError> {
        Ok(into_jobs(
            self.jobs.find_by_applicant_and_status(applicant_id, status)?,
        ))
    }

    pub fn get_jobs_posted_by(&self, poster: UserId) -> Result<Vec<Job>, JobServiceError> {
        Ok(into_jobs(self.jobs.find_by_posted_by(poster)?))
    }

    /// Overwrite the status of every matching applicant entry and save the job, matched or not.
    ///
    /// Moving to INTERVIEWING also records the interview time and notifies the applicant;
    /// notification failures are reported in the returned [`StatusChange`] only.
    pub fn change_app_status(
        &self,
        transition: ApplicationTransition,
    ) -> Result<StatusChange, JobServiceError> {
        let ApplicationTransition {
            id,
            applicant_id,
            application_status,
            interview_time,
        } = transition;

        let mut record = self.load(id)?;
        let mut matched = 0;
        let mut notifications = Vec::new();

        for entry in record
            .applicants
            .iter_mut()
            .filter(|entry| entry.applicant_id == applicant_id.0)
        {
            matched += 1;
            entry.application_status = application_status;
            if application_status == ApplicationStatus::Interviewing {
                entry.interview_time = interview_time;
                notifications.push(self.notify_best_effort(NotificationRequest {
                    action: "Interview Scheduled".to_string(),
                    message: format!("Interview scheduled for job id: {id}"),
                    user_id: applicant_id,
                    route: "/job-history".to_string(),
                }));
            }
        }

        let saved = self.jobs.save(record)?;
        info!(
            job_id = %id,
            applicant_id = %applicant_id,
            status = application_status.label(),
            matched,
            "application status changed"
        );

        Ok(StatusChange {
            job: saved.into_job(),
            matched,
            notifications,
        })
    }

    fn load(&self, id: JobId) -> Result<JobRecord, JobServiceError> {
        self.jobs
            .find_by_id(id)?
            .ok_or(JobServiceError::JobNotFound(id))
    }

    fn notify_best_effort(&self, request: NotificationRequest) -> DispatchOutcome {
        let user_id = request.user_id;
        match self.notifications.send(request) {
            Ok(()) => DispatchOutcome::Delivered,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "notification not delivered");
                DispatchOutcome::failed(err)
            }
        }
    }
}

fn into_jobs(records: Vec<JobRecord>) -> Vec<Job> {
    records.into_iter().map(JobRecord::into_job).collect()
}

/// Error raised by the job service.
#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("user {0} not found")]
    UserNotFound(UserId),
    #[error("user {applicant_id} has already applied to job {job_id}")]
    AlreadyApplied { job_id: JobId, applicant_id: UserId },
    #[error("job posted notification failed: {0}")]
    Notification(#[source] NotificationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl JobServiceError {
    /// Stable code reported to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::JobNotFound(_) => "JOB_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AlreadyApplied { .. } => "JOB_APPLIED_ALREADY",
            Self::Notification(_) => "NOTIFICATION_FAILED",
            Self::Repository(RepositoryError::Unavailable(_)) => "REPOSITORY_UNAVAILABLE",
            Self::Repository(_) => "JOB_VERSION_CONFLICT",
            Self::Directory(_) => "DIRECTORY_UNAVAILABLE",
            Self::Sequence(_) => "SEQUENCE_UNAVAILABLE",
        }
    }
}
