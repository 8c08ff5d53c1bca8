use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{Notification, NotificationId, NotificationRequest, NotificationStatus};
use super::store::{NotificationStore, StoreError};
use super::{NotificationDispatcher, NotificationError};
use crate::clock::{Clock, SystemClock};
use crate::sequence::SequenceGenerator;
use crate::users::UserId;

pub const NOTIFICATION_SEQUENCE: &str = "notification";

/// Inbox-backed notification delivery.
pub struct NotificationCenter<S> {
    store: Arc<S>,
    sequence: Arc<dyn SequenceGenerator>,
    clock: Arc<dyn Clock>,
}

impl<S> NotificationCenter<S>
where
    S: NotificationStore + 'static,
{
    pub fn new(store: Arc<S>, sequence: Arc<dyn SequenceGenerator>) -> Self {
        Self {
            store,
            sequence,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn unread_for(&self, user_id: UserId) -> Result<Vec<Notification>, NotificationCenterError> {
        Ok(self.store.unread_for(user_id)?)
    }

    /// Mark an entry read. Reading an already read entry is a no-op.
    pub fn mark_read(&self, id: NotificationId) -> Result<Notification, NotificationCenterError> {
        let mut notification = self
            .store
            .find(id)?
            .ok_or(NotificationCenterError::NotFound(id))?;

        if !notification.is_unread() {
            return Ok(notification);
        }

        notification.status = NotificationStatus::Read;
        let saved = self.store.save(notification)?;
        debug!(notification_id = %saved.id, user_id = %saved.user_id, "notification read");
        Ok(saved)
    }
}

impl<S> NotificationDispatcher for NotificationCenter<S>
where
    S: NotificationStore + 'static,
{
    fn send(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        let id = NotificationId(self.sequence.next_id(NOTIFICATION_SEQUENCE)?);
        let notification = Notification::unread(id, request, self.clock.now());
        let saved = self.store.save(notification)?;
        info!(
            notification_id = %saved.id,
            user_id = %saved.user_id,
            action = %saved.action,
            "notification queued"
        );
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationCenterError {
    #[error("notification {0} not found")]
    NotFound(NotificationId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl NotificationCenterError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NO_NOTIFICATION_FOUND",
            Self::Store(_) => "NOTIFICATION_STORE_UNAVAILABLE",
        }
    }
}
