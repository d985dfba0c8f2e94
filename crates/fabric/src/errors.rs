//! Error type shared by every layer of the UFM client.
//!
//! [`UfmError`] is a closed taxonomy: the transport normalises network and
//! status-code outcomes into it, the codec and translator fail fast with it
//! before any request is sent, and the manager passes it through (optionally
//! with added operation context) without ever changing its kind.

use thiserror::Error;

/// Convenience `Result` alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, UfmError>;

// ---------------------------------------------------------------------------
// Error kinds
// ---------------------------------------------------------------------------

/// Errors produced while talking to the UFM REST API.
///
/// The `Display` output is the message alone, so callers can prefix it with
/// their own wording ("Failed to get IB network in UFM: ...").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UfmError {
    /// Unclassified transport, marshalling, or service failure.
    #[error("{message}")]
    Unknown {
        /// Human-readable cause.
        message: String,
    },

    /// The resource does not exist.
    ///
    /// Produced by: an HTTP 404, or a read whose body is the empty object.
    #[error("{message}")]
    NotFound {
        /// Human-readable cause.
        message: String,
    },

    /// A partition key failed the 15-bit format or range check.
    #[error("{message}")]
    InvalidPKey {
        /// Human-readable cause.
        message: String,
    },

    /// Credentials given to the transport are missing or malformed.
    #[error("{message}")]
    Auth {
        /// Human-readable cause.
        message: String,
    },
}

impl UfmError {
    /// Creates an [`UfmError::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Creates an [`UfmError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an [`UfmError::InvalidPKey`].
    pub fn invalid_pkey(message: impl Into<String>) -> Self {
        Self::InvalidPKey {
            message: message.into(),
        }
    }

    /// Creates an [`UfmError::Auth`].
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Returns `true` if the resource was reported as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the human-readable message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Self::Unknown { message }
            | Self::NotFound { message }
            | Self::InvalidPKey { message }
            | Self::Auth { message } => message,
        }
    }

    /// Prefixes the message with operation context, keeping the error kind.
    ///
    /// `UfmError::not_found("Not Found").context("failed to get pkey 0x20")`
    /// is still a `NotFound`, with message
    /// `"failed to get pkey 0x20 with error: Not Found"`.
    #[must_use]
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        let wrap = |message: String| format!("{context} with error: {message}");
        match self {
            Self::Unknown { message } => Self::Unknown {
                message: wrap(message),
            },
            Self::NotFound { message } => Self::NotFound {
                message: wrap(message),
            },
            Self::InvalidPKey { message } => Self::InvalidPKey {
                message: wrap(message),
            },
            Self::Auth { message } => Self::Auth {
                message: wrap(message),
            },
        }
    }
}

impl From<serde_json::Error> for UfmError {
    fn from(err: serde_json::Error) -> Self {
        Self::unknown(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        assert_eq!(UfmError::auth("no password").to_string(), "no password");
    }

    #[test]
    fn context_keeps_the_error_kind() {
        let err = UfmError::not_found("Not Found").context("failed to get pkey 0x20");
        assert!(err.is_not_found());
        assert_eq!(err.message(), "failed to get pkey 0x20 with error: Not Found");

        let err = UfmError::unknown("boom").context("failed to delete PKey 0x0020");
        assert!(matches!(err, UfmError::Unknown { .. }));
    }
}
