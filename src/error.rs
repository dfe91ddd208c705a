//! Error types for the onboarding flow.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures reported by external collaborators (upload, lookup, persistence).
///
/// `Display` yields the collaborator's message unchanged so it can be shown
/// to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Resolve(String),

    #[error("{0}")]
    CompleteProfile(String),

    #[error("{0}")]
    SaveLocation(String),
}

impl ServiceError {
    /// The user-facing message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Upload(m)
            | Self::Resolve(m)
            | Self::CompleteProfile(m)
            | Self::SaveLocation(m) => m,
        }
    }
}

/// Flow-level misuse. None of these are reachable through the normal
/// controller surface; they guard the public API against out-of-order calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error("Step {0} is outside 1..=5")]
    InvalidStep(u8),

    #[error("Completion requested from step {0}, which is not a terminal step")]
    NotAtTerminalStep(u8),

    #[error("Location request has not been submitted yet")]
    SubFlowNotReady,
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
