pub mod celebration;
pub mod onboarding;
pub mod slack_events;
pub mod workspace;
