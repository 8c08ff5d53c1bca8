//! Read access to the user accounts owned by the account subsystem.
//!
//! The job service only ever needs a user's display name and email address, so the directory
//! contract is a single lookup. [`UserRegistry`] adds the write side used by local deployments
//! that keep accounts in memory.

pub mod router;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use router::user_router;

/// Identifier shared by job posters and applicants.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

pub trait UserDirectory: Send + Sync {
    fn find(&self, id: UserId) -> Result<Option<User>, DirectoryError>;
}

/// Directory that also accepts account registrations.
pub trait UserRegistry: UserDirectory {
    fn upsert(&self, user: User) -> Result<User, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}
