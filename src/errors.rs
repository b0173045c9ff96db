//! Error types for gateway operations.
//!
//! Every failure path raises the same typed error so callers can branch on
//! `status` and `code` without downcasting. Status `0` is reserved for
//! failures where no HTTP response was obtained at all: transport errors,
//! unparseable bodies, and local credential-store failures.

use std::fmt;

use crate::envelope::ErrorEnvelope;

/// Classification of an [`ApiError`], derived from its HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Request rejected by input validation (400, 422).
    Validation,
    /// Missing or rejected credentials (401).
    Unauthorized,
    /// Authenticated but not allowed (403). Never special-cased by the
    /// gateway; exposed for callers only.
    Forbidden,
    /// Resource does not exist (404).
    NotFound,
    /// Server-side failure (5xx).
    Server,
    /// The request never completed: transport failure or unparseable
    /// response (status 0).
    Network,
    /// Any other non-2xx status.
    Other,
}

/// Typed error raised by every gateway failure path.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code, or `0` when no response was obtained.
    pub status: u16,
    /// Machine-readable code from the failure envelope, when present.
    pub code: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Offending field for validation failures.
    pub field: Option<String>,
}

impl ApiError {
    /// Create an error for the given HTTP status.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
            field: None,
        }
    }

    /// Create a status-0 error for a request that never completed.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    /// Attach a machine-readable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the offending field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Build an error from a parsed failure envelope.
    ///
    /// The code is taken from `errors[0].code`, falling back to the
    /// top-level `error` string; the field from `errors[0].field`.
    pub fn from_envelope(status: u16, envelope: &ErrorEnvelope) -> Self {
        let code = envelope
            .first_error_code()
            .map(str::to_string)
            .or_else(|| envelope.error.clone());
        let message = envelope
            .error_message()
            .unwrap_or("request failed")
            .to_string();

        Self {
            status,
            code,
            message,
            field: envelope.first_error_field().map(str::to_string),
        }
    }

    /// Classify this error by its status code.
    pub fn kind(&self) -> ApiErrorKind {
        match self.status {
            0 => ApiErrorKind::Network,
            400 | 422 => ApiErrorKind::Validation,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }

    /// Check whether this is a 401.
    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ApiErrorKind::Unauthorized
    }

    /// Check whether the request never reached the server.
    pub fn is_network(&self) -> bool {
        self.kind() == ApiErrorKind::Network
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_network() {
            write!(f, "network error: {}", self.message)?;
        } else {
            write!(f, "api error ({}): {}", self.status, self.message)?;
        }
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<crate::credentials::StoreError> for ApiError {
    fn from(err: crate::credentials::StoreError) -> Self {
        // A store failure means the request could not be issued at all.
        Self::network(err.to_string())
    }
}
