//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod channel_repo;
pub mod onboarding_repo;
pub mod person_repo;
pub mod workspace_repo;

pub use channel_repo::ChannelRepo;
pub use onboarding_repo::OnboardingRepo;
pub use person_repo::PersonRepo;
pub use workspace_repo::WorkspaceRepo;
