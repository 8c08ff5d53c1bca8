use metrics_exporter_prometheus::PrometheusHandle;
use skillbridge::email::{EmailDispatcher, EmailError};
use skillbridge::jobs::{
    next_version, ApplicationStatus, JobId, JobRecord, JobRepository, RepositoryError,
};
use skillbridge::notifications::{Notification, NotificationId, NotificationStore, StoreError};
use skillbridge::users::{DirectoryError, User, UserDirectory, UserId, UserRegistry};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn poisoned(what: &str) -> String {
    format!("{what} mutex poisoned")
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    records: Arc<Mutex<BTreeMap<JobId, JobRecord>>>,
}

impl InMemoryJobRepository {
    fn select(
        &self,
        predicate: impl Fn(&JobRecord) -> bool,
    ) -> Result<Vec<JobRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable(poisoned("job repository")))?;
        Ok(guard
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect())
    }
}

impl JobRepository for InMemoryJobRepository {
    fn find_by_id(&self, id: JobId) -> Result<Option<JobRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable(poisoned("job repository")))?;
        Ok(guard.get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<JobRecord>, RepositoryError> {
        self.select(|_| true)
    }

    fn find_by_applicant_and_status(
        &self,
        applicant_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Vec<JobRecord>, RepositoryError> {
        self.select(|record| record.has_application_in(applicant_id, status))
    }

    fn find_by_posted_by(&self, poster: UserId) -> Result<Vec<JobRecord>, RepositoryError> {
        self.select(|record| record.is_posted_by(poster))
    }

    fn save(&self, mut record: JobRecord) -> Result<JobRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable(poisoned("job repository")))?;
        record.version = next_version(&record, guard.get(&record.job_id()))?;
        guard.insert(record.job_id(), record.clone());
        Ok(record)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryUserDirectory {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl UserDirectory for InMemoryUserDirectory {
    fn find(&self, id: UserId) -> Result<Option<User>, DirectoryError> {
        let guard = self
            .users
            .lock()
            .map_err(|_| DirectoryError::Unavailable(poisoned("user directory")))?;
        Ok(guard.get(&id).cloned())
    }
}

impl UserRegistry for InMemoryUserDirectory {
    fn upsert(&self, user: User) -> Result<User, DirectoryError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|_| DirectoryError::Unavailable(poisoned("user directory")))?;
        guard.insert(user.id, user.clone());
        Ok(user)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationStore {
    entries: Arc<Mutex<BTreeMap<NotificationId, Notification>>>,
}

impl NotificationStore for InMemoryNotificationStore {
    fn save(&self, notification: Notification) -> Result<Notification, StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable(poisoned("notification store")))?;
        guard.insert(notification.id, notification.clone());
        Ok(notification)
    }

    fn find(&self, id: NotificationId) -> Result<Option<Notification>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable(poisoned("notification store")))?;
        Ok(guard.get(&id).cloned())
    }

    fn unread_for(&self, user_id: UserId) -> Result<Vec<Notification>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable(poisoned("notification store")))?;
        Ok(guard
            .values()
            .filter(|entry| entry.user_id == user_id && entry.is_unread())
            .cloned()
            .collect())
    }
}

/// Email dispatcher that always fails, used by the demo to show best-effort delivery.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct UnreachableEmailDispatcher;

impl EmailDispatcher for UnreachableEmailDispatcher {
    fn send_html(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), EmailError> {
        Err(EmailError::Transport(
            "smtp relay unreachable (demo)".to_string(),
        ))
    }
}
