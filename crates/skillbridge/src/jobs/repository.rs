use super::domain::{ApplicationStatus, JobId};
use super::record::JobRecord;
use crate::users::UserId;

/// Storage abstraction for the job aggregate.
///
/// `save` writes the whole aggregate, applicants included. It is a compare-and-swap on
/// [`JobRecord::version`]: a record read at version `n` saves only while the stored copy is still
/// at `n`, and the stored copy then moves to `n + 1`. A record with version 0 is an insert.
pub trait JobRepository: Send + Sync {
    fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>, RepositoryError>;
    fn find_all(&self) -> Result<Vec<JobRecord>, RepositoryError>;
    fn find_by_applicant_and_status(
        &self,
        applicant_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<JobRecord>, RepositoryError>;
    fn find_by_posted_by(&self, poster: UserId) -> Result<Vec<JobRecord>, RepositoryError>;
    fn save(&self, record: JobRecord) -> Result<JobRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("job {id} was modified concurrently (read at version {expected}, stored version {found})")]
    VersionConflict { id: JobId, expected: u64, found: u64 },
    #[error("job {0} already exists")]
    Duplicate(JobId),
    #[error("job {0} no longer exists")]
    Missing(JobId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Version `incoming` is stored at when written over `stored`, or the reason it must be rejected.
///
/// Adapters call this under the same lock (or transaction) as the write itself.
pub fn next_version(
    incoming: &JobRecord,
    stored: Option<&JobRecord>,
) -> Result<u64, RepositoryError> {
    match (incoming.version, stored) {
        (0, None) => Ok(1),
        (0, Some(_)) => Err(RepositoryError::Duplicate(incoming.job_id())),
        (_, None) => Err(RepositoryError::Missing(incoming.job_id())),
        (expected, Some(current)) if current.version == expected => Ok(expected + 1),
        (expected, Some(current)) => Err(RepositoryError::VersionConflict {
            id: incoming.job_id(),
            expected,
            found: current.version,
        }),
    }
}
