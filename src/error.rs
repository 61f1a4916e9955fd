use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Failure of an admin operation.
///
/// Validation and not-found errors carry the message shown to the administrator.
/// Internal errors are logged and replaced by a generic message.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AdminError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AdminError::NotFound(msg.into())
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Validation(msg) | AdminError::NotFound(msg) => msg.clone(),
            AdminError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
