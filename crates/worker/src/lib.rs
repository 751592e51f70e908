//! Celebration scheduling, dispatch and inbound profile updates.
//!
//! Everything here talks to Slack only through the
//! [`cheers_core::messaging`] traits, so the same services run against the
//! real Web API, the no-op client, or a test double.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod inbound;
pub mod onboarding;
pub mod overview;
pub mod roster;
pub mod scheduler;
pub mod selector;

pub use dispatcher::CelebrationDispatcher;
pub use error::{DispatchError, OnboardingError, RosterError};
pub use scheduler::CelebrationScheduler;
