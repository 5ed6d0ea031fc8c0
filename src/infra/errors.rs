// src/infra/errors.rs - Error types for DishHub

use thiserror::Error;

use crate::cooking::validation::ValidationError;

/// Generic message shown when the backend fails without telling us why.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Error, Debug)]
pub enum DishHubError {
    // Local, raised before any request is sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot {action} while the dish is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Cooking session was closed before the response arrived")]
    SessionClosed,

    // Backend errors
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("{message}")]
    BackendRejection { message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process exit codes.
pub const EXIT_FAILURE: i32 = 1;
/// The input or the current state was wrong; nothing reached the backend.
pub const EXIT_USER_ERROR: i32 = 2;
pub const EXIT_BACKEND_FAILURE: i32 = 3;

impl DishHubError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Wrap a backend message, falling back to the generic text when it is blank.
    pub fn rejection(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        Self::BackendRejection { message }
    }

    /// Errors the user can fix by changing their input or waiting on the
    /// current state, as opposed to backend or infrastructure failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DishHubError::Validation(_) | DishHubError::InvalidTransition { .. }
        )
    }

    /// True when a request reached the backend (or tried to) and failed.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            DishHubError::Transport { .. }
                | DishHubError::BackendRejection { .. }
                | DishHubError::Decode(_)
        )
    }
}

/// Exit code for an error that ended a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DishHubError>() {
        Some(e) if e.is_user_error() => EXIT_USER_ERROR,
        Some(e) if e.is_backend_failure() => EXIT_BACKEND_FAILURE,
        _ => EXIT_FAILURE,
    }
}

/// What to print on stderr for an error that ended a command.
///
/// User errors are shown as plain sentences; an unreachable backend gets a
/// hint about the base URL.
pub fn error_report(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DishHubError>() {
        Some(e) if e.is_user_error() => e.to_string(),
        Some(e @ DishHubError::Transport { .. }) => format!(
            "error: {e}\nhint: is the DishHub backend running? Check --base-url or [backend] base_url"
        ),
        _ => format!("error: {err:#}"),
    }
}
