use cheers_core::messaging::MessagingError;

/// Failure of one channel's dispatch pass. Sibling channels are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid channel timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Messaging(#[from] MessagingError),
}

/// Failure that stops an onboarding DM run before any member is contacted.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("list workspace members: {0}")]
    Directory(#[from] MessagingError),
}

/// Failure to build a workspace people list.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("list workspace members: {0}")]
    Directory(#[from] MessagingError),
}
