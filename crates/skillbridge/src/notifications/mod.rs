//! In-app notifications raised by job lifecycle events.
//!
//! [`NotificationDispatcher`] is the narrow contract the job service calls. The default
//! implementation, [`NotificationCenter`], stores each request as an unread inbox entry for the
//! addressed user.

pub mod domain;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{
    Notification, NotificationId, NotificationRequest, NotificationStatus,
};
pub use router::notification_router;
pub use service::{NotificationCenter, NotificationCenterError, NOTIFICATION_SEQUENCE};
pub use store::{NotificationStore, StoreError};

use crate::sequence::SequenceError;

/// Delivers a notification request to its channel.
pub trait NotificationDispatcher: Send + Sync {
    fn send(&self, request: NotificationRequest) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
}
