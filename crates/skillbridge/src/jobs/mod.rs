//! Job postings and the applications made against them.
//!
//! A job and its applicant list form one aggregate: every mutation loads the [`JobRecord`],
//! changes it, and saves it back whole through [`JobRepository`].

pub mod domain;
pub mod record;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ApplicationStatus, ApplicationTransition, Job, JobId, JobStatus,
};
pub use record::{ApplicantRecord, JobRecord};
pub use repository::{next_version, JobRepository, RepositoryError};
pub use router::job_router;
pub use service::{
    ApplicationReceipt, DispatchOutcome, JobService, JobServiceError, StatusChange, JOB_SEQUENCE,
};
