use thiserror::Error;

// Local form checks; never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("{label} must be in the future")]
    DateNotInFuture { label: &'static str },
    #[error("{label} must be a valid calendar date")]
    InvalidDate { label: &'static str },
    #[error("Group size must be at least 1")]
    GroupSizeTooSmall,
    #[error("Group size must be a whole number")]
    GroupSizeNotWhole,
    #[error("Group size is too large")]
    GroupSizeTooLarge,
}

pub const TIMEOUT_MESSAGE: &str = "Request timed out. Please try again.";
pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Submission failed";
pub const NETWORK_FALLBACK_MESSAGE: &str = "Network error";

// Outcomes of a submission attempt that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Request timed out. Please try again.")]
    Timeout,
    #[error("{0}")]
    Network(String),
    #[error("{0}")]
    ServerRejected(String),
    #[error("Please log in to continue.")]
    MissingAuth,
}

// Failures talking to the hosted provider (auth, tables, functions).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(String),
    #[error("provider upstream error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Upstream { status: u16, message: Option<String> },
    #[error("provider response decode error: {0}")]
    Decode(String),
    #[error("provider call cancelled")]
    Cancelled,
}

impl ProviderError {
    // Message worth showing to a user, if the provider sent one.
    pub fn user_message(&self) -> Option<&str> {
        let message = match self {
            ProviderError::Transport(message) => Some(message.as_str()),
            ProviderError::Upstream { message, .. } => message.as_deref(),
            ProviderError::Decode(_) | ProviderError::Cancelled => None,
        };
        message.filter(|message| !message.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFlowError {
    #[error("Please fill all fields")]
    MissingSignUpFields,
    #[error("{0}")]
    Rejected(String),
}

impl From<ProviderError> for AuthFlowError {
    fn from(err: ProviderError) -> Self {
        let message = err.user_message().unwrap_or("Authentication error");
        AuthFlowError::Rejected(message.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Please log in to continue.")]
    AuthRequired,
    #[error("{0}")]
    Provider(String),
}

impl From<ProviderError> for ProfileError {
    fn from(err: ProviderError) -> Self {
        let message = err.user_message().map(str::to_string);
        ProfileError::Provider(message.unwrap_or_else(|| err.to_string()))
    }
}
