// Errors surfaced to the host framework
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Pipeline error with a status code and client-friendly message
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CmsError {
    // 400 Bad Request
    #[error("{message}")]
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl CmsError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            CmsError::ValidationError { .. } => 400,
            CmsError::Forbidden(_) => 403,
            CmsError::NotFound(_) => 404,
            CmsError::UnknownCollection(_) => 404,
            CmsError::Internal(_) => 500,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CmsError::ValidationError { .. } => "VALIDATION_ERROR",
            CmsError::Forbidden(_) => "FORBIDDEN",
            CmsError::NotFound(_) => "NOT_FOUND",
            CmsError::UnknownCollection(_) => "UNKNOWN_COLLECTION",
            CmsError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.to_string(),
            "code": self.error_code()
        });

        if let CmsError::ValidationError { field_errors: Some(field_errors), .. } = self {
            response["field_errors"] = json!(field_errors);
        }

        response
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        CmsError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), message.into());
        CmsError::validation_error("Invalid field value", Some(field_errors))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        CmsError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CmsError::NotFound(message.into())
    }

    pub fn unknown_collection(slug: impl Into<String>) -> Self {
        CmsError::UnknownCollection(slug.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CmsError::Internal(message.into())
    }
}

impl From<crate::filter::FilterError> for CmsError {
    fn from(err: crate::filter::FilterError) -> Self {
        CmsError::validation_error(err.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_codes() {
        assert_eq!(CmsError::forbidden("no").status_code(), 403);
        assert_eq!(CmsError::unknown_collection("x").error_code(), "UNKNOWN_COLLECTION");
        assert_eq!(CmsError::field_error("amount", "must be a number").status_code(), 400);
    }

    #[test]
    fn validation_body_carries_field_errors() {
        let body = CmsError::field_error("status", "must be one of pending, paid, overdue").to_json();
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["field_errors"]["status"], json!("must be one of pending, paid, overdue"));
    }

    #[test]
    fn filter_errors_become_validation_errors() {
        let err: CmsError = crate::filter::FilterError::InvalidLimit("Limit must be non-negative".into()).into();
        assert_eq!(err.status_code(), 400);
    }
}
