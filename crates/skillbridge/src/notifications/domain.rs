use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::users::UserId;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a caller wants delivered: an action label, a message, the addressee, and the client route
/// the notification links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub action: String,
    pub message: String,
    pub user_id: UserId,
    pub route: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Unread,
    Read,
}

/// Inbox entry stored for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub action: String,
    pub message: String,
    pub route: String,
    pub status: NotificationStatus,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn unread(
        id: NotificationId,
        request: NotificationRequest,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let NotificationRequest {
            action,
            message,
            user_id,
            route,
        } = request;

        Self {
            id,
            user_id,
            action,
            message,
            route,
            status: NotificationStatus::Unread,
            timestamp,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}
