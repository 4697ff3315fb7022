//! API response types
//!
//! A response is a numeric status plus a JSON body. Errors carry
//! `{"code", "message"}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::ApiError;

/// Unified response type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    /// 200
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// 201
    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    /// 202, work scheduled
    pub fn accepted(body: Value) -> Self {
        Self { status: 202, body }
    }

    /// Create an error response
    pub fn error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            body: json!({
                "code": err.code().code(),
                "message": err.message(),
            }),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        json!({ "status": self.status, "body": self.body }).to_string()
    }
}
