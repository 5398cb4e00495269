//! Error model for the auth domain.

use thiserror::Error;

/// Result type used across the auth domain.
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth domain error.
///
/// `InvalidCredential` is a user-facing failure (bad username/password/email).
/// `InvalidRole` and `CyclicRoleGraph` indicate data-integrity problems in the
/// role graph rather than user error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// A supplied credential (username, password, email) failed validation
    /// or authentication.
    #[error("invalid {credential}: {message}")]
    InvalidCredential { credential: String, message: String },

    /// A role is missing from the store, or its ancestor chain is broken.
    #[error("the role '{role}' is invalid for the country '{country}': {message}")]
    InvalidRole {
        country: String,
        role: String,
        message: String,
    },

    /// The parent graph loops back on itself. Always a data defect.
    #[error("cyclic role graph detected at '{country}/{role}'")]
    CyclicRoleGraph { country: String, role: String },

    /// No token was presented.
    #[error("not authenticated")]
    Unauthenticated,

    /// A token was presented but is expired, malformed, or carries
    /// insufficient access.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An infrastructure adapter (store, hasher, signer) failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn credential(credential: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            credential: credential.into(),
            message: message.into(),
        }
    }

    pub fn role(
        country: impl Into<String>,
        role: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRole {
            country: country.into(),
            role: role.into(),
            message: message.into(),
        }
    }

    pub fn cycle(country: impl Into<String>, role: impl Into<String>) -> Self {
        Self::CyclicRoleGraph {
            country: country.into(),
            role: role.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
