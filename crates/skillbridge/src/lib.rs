//! SkillBridge job portal backend.
//!
//! The [`jobs`] module holds the job lifecycle service: posting jobs, applying to them, and
//! moving applicants through the hiring pipeline. Persistence, notification delivery, and email
//! transport are reached through the traits in [`jobs::repository`], [`notifications`], and
//! [`email`] so adapters can be swapped per deployment.

pub mod clock;
pub mod config;
pub mod email;
pub mod error;
pub mod jobs;
pub mod notifications;
pub mod sequence;
pub mod telemetry;
pub mod users;
