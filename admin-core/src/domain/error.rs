use thiserror::Error;

use crate::edit::{EditMode, Ticket};

/// Failures reported by a backend port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("record not found")]
    NotFound,
    #[error("rejected by server: {0}")]
    Validation(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// The initial load of a view failed. Rendered as a blocking error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("{0} id is missing")]
    MissingId(&'static str),
    #[error("failed to load {what}: {source}")]
    Api {
        what: &'static str,
        #[source]
        source: ApiError,
    },
}

/// Raw user input could not be coerced into a field's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("`{0}` is not a date (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("`{0}` is not a time (expected HH:MM)")]
    InvalidTime(String),
    #[error("`{0}` is not a non-negative whole number")]
    InvalidNumber(String),
    #[error("`{0}` is not true or false")]
    InvalidFlag(String),
    #[error("`{value}` is not a valid {kind}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// A controller operation was not valid in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{target} is {actual}, expected {expected}")]
    InvalidState {
        target: String,
        expected: &'static str,
        actual: EditMode,
    },
    #[error("{field} does not accept a {found} value")]
    TypeMismatch { field: String, found: &'static str },
    #[error("{0} does not match any save in flight")]
    StaleTicket(Ticket),
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl EditError {
    pub(crate) fn invalid_state(
        target: impl ToString,
        expected: &'static str,
        actual: EditMode,
    ) -> Self {
        Self::InvalidState {
            target: target.to_string(),
            expected,
            actual,
        }
    }
}
