use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::clock::FixedClock;
use crate::email::{EmailDispatcher, EmailError};
use crate::jobs::domain::{Applicant, ApplicationStatus, Job, JobId};
use crate::jobs::record::JobRecord;
use crate::jobs::repository::{next_version, JobRepository, RepositoryError};
use crate::jobs::service::JobService;
use crate::notifications::{NotificationDispatcher, NotificationError, NotificationRequest};
use crate::sequence::InMemorySequence;
use crate::users::{DirectoryError, User, UserDirectory, UserId};

pub(super) type TestService =
    JobService<MemoryJobRepository, MemoryUsers, MemoryNotifications, MemoryEmail>;

pub(super) const POSTER: UserId = UserId(42);
pub(super) const APPLICANT: UserId = UserId(7);

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()
}

pub(super) fn backend_engineer() -> Job {
    let mut job = Job::new("Backend Engineer", "Acme", POSTER);
    job.location = "Remote".to_string();
    job.skills_required = vec!["Rust".to_string(), "SQL".to_string()];
    job
}

pub(super) fn applicant(id: UserId) -> Applicant {
    let mut applicant = Applicant::new(id);
    applicant.name = Some("Priya".to_string());
    applicant.email = Some("priya@example.com".to_string());
    applicant.cover_letter = Some("Happy to help with the ledger.".to_string());
    applicant
}

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) jobs: Arc<MemoryJobRepository>,
    pub(super) users: Arc<MemoryUsers>,
    pub(super) notifications: Arc<MemoryNotifications>,
    pub(super) email: Arc<MemoryEmail>,
    pub(super) clock: Arc<FixedClock>,
}

pub(super) fn harness() -> Harness {
    harness_with(MemoryNotifications::default(), MemoryEmail::default())
}

pub(super) fn harness_with(notifications: MemoryNotifications, email: MemoryEmail) -> Harness {
    let jobs = Arc::new(MemoryJobRepository::default());
    let users = Arc::new(MemoryUsers::default());
    users.insert(User {
        id: APPLICANT,
        name: "Priya".to_string(),
        email: "priya@example.com".to_string(),
    });
    users.insert(User {
        id: POSTER,
        name: "Morgan".to_string(),
        email: "morgan@acme.test".to_string(),
    });
    let notifications = Arc::new(notifications);
    let email = Arc::new(email);
    let clock = Arc::new(FixedClock::new(now()));
    let sequence = Arc::new(InMemorySequence::new().resume_after("jobs", 100));

    let service = JobService::new(
        jobs.clone(),
        users.clone(),
        notifications.clone(),
        email.clone(),
        sequence,
    )
    .with_clock(clock.clone());

    Harness {
        service,
        jobs,
        users,
        notifications,
        email,
        clock,
    }
}

#[derive(Default)]
pub(super) struct MemoryJobRepository {
    records: Mutex<BTreeMap<JobId, JobRecord>>,
    saves: AtomicUsize,
}

impl MemoryJobRepository {
    pub(super) fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub(super) fn stored(&self, id: JobId) -> Option<JobRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(&id)
            .cloned()
    }

    /// Bump the stored version, as if another writer saved the job in between.
    pub(super) fn touch(&self, id: JobId) {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if let Some(record) = guard.get_mut(&id) {
            record.version += 1;
        }
    }

    fn select(&self, predicate: impl Fn(&JobRecord) -> bool) -> Vec<JobRecord> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

impl JobRepository for MemoryJobRepository {
    fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>, RepositoryError> {
        Ok(self.stored(id))
    }

    fn find_all(&self) -> Result<Vec<JobRecord>, RepositoryError> {
        Ok(self.select(|_| true))
    }

    fn find_by_applicant_and_status(
        &self,
        applicant_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<JobRecord>, RepositoryError> {
        Ok(self.select(|record| record.has_application_in(applicant_id, status)))
    }

    fn find_by_posted_by(&self, poster: UserId) -> Result<Vec<JobRecord>, RepositoryError> {
        Ok(self.select(|record| record.is_posted_by(poster)))
    }

    fn save(&self, mut record: JobRecord) -> Result<JobRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        record.version = next_version(&record, guard.get(&record.job_id()))?;
        guard.insert(record.job_id(), record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }
}

pub(super) struct UnavailableRepository;

impl JobRepository for UnavailableRepository {
    fn find_by_id(&self, _id: JobId) -> Result<Option<JobRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_all(&self) -> Result<Vec<JobRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_applicant_and_status(
        &self,
        _applicant_id: UserId,
        _status: ApplicationStatus,
    ) -> Result<Vec<JobRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_posted_by(&self, _poster: UserId) -> Result<Vec<JobRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn save(&self, _record: JobRecord) -> Result<JobRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryUsers {
    users: Mutex<HashMap<UserId, User>>,
}

impl MemoryUsers {
    pub(super) fn insert(&self, user: User) {
        self.users
            .lock()
            .expect("users mutex poisoned")
            .insert(user.id, user);
    }

    pub(super) fn remove(&self, id: UserId) {
        self.users.lock().expect("users mutex poisoned").remove(&id);
    }
}

impl UserDirectory for MemoryUsers {
    fn find(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.lock().expect("users mutex poisoned").get(&id).cloned())
    }
}

/// Records every request; fails them all when built with [`MemoryNotifications::failing`].
#[derive(Default)]
pub(super) struct MemoryNotifications {
    requests: Mutex<Vec<NotificationRequest>>,
    fail: AtomicBool,
}

impl MemoryNotifications {
    pub(super) fn failing() -> Self {
        let notifications = Self::default();
        notifications.fail.store(true, Ordering::SeqCst);
        notifications
    }

    pub(super) fn requests(&self) -> Vec<NotificationRequest> {
        self.requests.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationDispatcher for MemoryNotifications {
    fn send(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        self.requests
            .lock()
            .expect("notification mutex poisoned")
            .push(request);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Unavailable("push gateway down".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct SentEmail {
    pub(super) to: String,
    pub(super) subject: String,
    pub(super) html_body: String,
}

/// Records every attempted email; fails them all when built with [`MemoryEmail::failing`] and
/// holds the calling thread when built with [`MemoryEmail::slow`].
#[derive(Default)]
pub(super) struct MemoryEmail {
    sent: Mutex<Vec<SentEmail>>,
    fail: AtomicBool,
    latency: Duration,
}

impl MemoryEmail {
    pub(super) fn failing() -> Self {
        let email = Self::default();
        email.fail.store(true, Ordering::SeqCst);
        email
    }

    pub(super) fn slow(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub(super) fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().expect("email mutex poisoned").clone()
    }
}

impl EmailDispatcher for MemoryEmail {
    fn send_html(&self, to: &str, subject: &str, html_body: &str) -> Result<(), EmailError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }
        self.sent.lock().expect("email mutex poisoned").push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
