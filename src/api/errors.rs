//! API error types
//!
//! API errors are pass-through: the status and message of the failing
//! subsystem reach the caller unchanged. Denied and missing objects both
//! arrive here as `NotFound` and produce byte-identical responses.

use std::fmt;

use crate::documents::DocumentError;
use crate::events::EventError;
use crate::export::ExportError;
use crate::file_caching::CacheError;

/// API-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Malformed or out-of-range request
    InvalidRequest,
    /// Absent or not visible to the caller
    NotFound,
    /// Artifact exceeds a configured limit
    TooLarge,
    /// A backing store cannot serve requests
    Unavailable,
    /// Any other failure
    Internal,
}

impl ApiErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidRequest => "VELLUM_INVALID_REQUEST",
            ApiErrorCode::NotFound => "VELLUM_NOT_FOUND",
            ApiErrorCode::TooLarge => "VELLUM_TOO_LARGE",
            ApiErrorCode::Unavailable => "VELLUM_UNAVAILABLE",
            ApiErrorCode::Internal => "VELLUM_INTERNAL",
        }
    }

    /// Code for a subsystem status
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorCode::InvalidRequest,
            404 => ApiErrorCode::NotFound,
            413 => ApiErrorCode::TooLarge,
            503 => ApiErrorCode::Unavailable,
            _ => ApiErrorCode::Internal,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// API error with preserved subsystem status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: ApiErrorCode,
    status: u16,
    message: String,
}

impl ApiError {
    /// Wrap a subsystem failure
    pub fn pass_through(status: u16, message: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::pass_through(400, reason)
    }

    /// Create a not found error for an object reference string
    pub fn not_found(object: impl fmt::Display) -> Self {
        Self::pass_through(404, format!("Not found: {}", object))
    }

    pub fn code(&self) -> ApiErrorCode {
        self.code
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        Self::pass_through(e.status_code(), e.to_string())
    }
}

impl From<CacheError> for ApiError {
    fn from(e: CacheError) -> Self {
        Self::pass_through(e.status_code(), e.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        Self::pass_through(e.status_code(), e.to_string())
    }
}

impl From<EventError> for ApiError {
    fn from(e: EventError) -> Self {
        Self::pass_through(e.status_code(), e.to_string())
    }
}

impl From<crate::access::AccessDenied> for ApiError {
    fn from(denied: crate::access::AccessDenied) -> Self {
        Self::not_found(denied.object())
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
