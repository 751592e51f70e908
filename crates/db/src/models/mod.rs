//! Row models and DTOs.

pub mod channel;
pub mod dispatch_log;
pub mod onboarding;
pub mod person;
pub mod workspace;
