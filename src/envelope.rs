//! The uniform response envelope wrapping every API response.
//!
//! Every endpoint, success or failure, answers with the same JSON shape:
//! `{ success, data?, error?, errors?, meta? }`. A successful envelope
//! always carries `data`; a failed one carries `error` and/or a list of
//! structured `errors` entries. The reverse is deliberately not enforced:
//! `success == false` may omit `errors` and rely on `error` alone.

use serde::{Deserialize, Serialize};

/// Response envelope returned by every API endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub success: bool,

    /// Payload, present when `success` is true.
    ///
    /// No `serde(default)` here: an absent `Option` field already reads as
    /// `None`, and a defaulted field would saddle the derived impl with a
    /// `T: Default` bound the dispatch path cannot satisfy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Top-level error description for failed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Structured error entries, most specific first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiErrorDetail>>,

    /// Pagination metadata for list endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// A single structured error entry from a failure envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g. `VALIDATION_ERROR`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Offending form field, when the error is a validation failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Pagination metadata attached to list responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total number of matching records.
    pub total: u64,
    /// Total number of pages.
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Failure envelope with an opaque payload type.
///
/// Error bodies are parsed with this alias since the caller's `T` is
/// irrelevant once `success` is false.
pub type ErrorEnvelope = ApiResponse<serde_json::Value>;

impl<T> ApiResponse<T> {
    /// Code of the first structured error entry, if any.
    pub fn first_error_code(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errs| errs.first())
            .map(|e| e.code.as_str())
    }

    /// Field of the first structured error entry, if any.
    pub fn first_error_field(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errs| errs.first())
            .and_then(|e| e.field.as_deref())
    }

    /// Best available error message: `errors[0].message`, else `error`.
    pub fn error_message(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errs| errs.first())
            .map(|e| e.message.as_str())
            .or(self.error.as_deref())
    }
}
