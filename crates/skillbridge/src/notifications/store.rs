use super::domain::{Notification, NotificationId};
use crate::users::UserId;

/// Storage abstraction for inbox entries.
pub trait NotificationStore: Send + Sync {
    /// Insert or replace by id.
    fn save(&self, notification: Notification) -> Result<Notification, StoreError>;
    fn find(&self, id: NotificationId) -> Result<Option<Notification>, StoreError>;
    /// Unread entries for a user, oldest first.
    fn unread_for(&self, user_id: UserId) -> Result<Vec<Notification>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("notification store unavailable: {0}")]
    Unavailable(String),
}
