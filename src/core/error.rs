//! Typed error handling for the order service
//!
//! Every layer (store, service, HTTP) speaks [`OrderError`]. The store and
//! service layers return it untranslated; only the HTTP layer turns it into a
//! status code and a caller-safe JSON body through [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed, missing or out-of-enumeration input (400)
//! - [`OrderError::NotFound`]: the referenced order does not exist (404)
//! - [`StorageError`]: transaction, connectivity or constraint failures (500)
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get_order(id).await {
//!     Ok(order) => println!("{}", order.status),
//!     Err(OrderError::NotFound { id }) => println!("no order {}", id),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

use crate::core::order::OrderStatus;

/// The main error type for the order service
#[derive(Debug, Error)]
pub enum OrderError {
    /// Request input failed decoding or validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced order does not exist
    #[error("order '{id}' not found")]
    NotFound { id: String },

    /// The store could not complete the operation
    #[error(transparent)]
    Persistence(#[from] StorageError),
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable, caller-safe message
    pub error: String,
    /// Stable code for programmatic handling
    pub code: String,
    /// Optional diagnostic detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl OrderError {
    pub fn not_found(id: impl ToString) -> Self {
        OrderError::NotFound { id: id.to_string() }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderError::NotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::Validation(e) => e.error_code(),
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Persistence failures never carry their cause to the caller.
    pub fn to_response(&self) -> ErrorResponse {
        let error = match self {
            OrderError::Persistence(_) => "Failed to process order request".to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            error,
            code: self.error_code().to_string(),
            detail: self.detail(),
        }
    }

    fn detail(&self) -> Option<serde_json::Value> {
        match self {
            OrderError::NotFound { id } => Some(serde_json::json!({ "id": id })),
            OrderError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            OrderError::Validation(ValidationError::InvalidStatus { .. }) => {
                let accepted: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                Some(serde_json::json!({ "accepted": accepted }))
            }
            OrderError::Validation(ValidationError::InvalidJson { message }) => {
                Some(serde_json::json!(message))
            }
            _ => None,
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        if let OrderError::Persistence(cause) = &self {
            tracing::error!(error = %cause, "order request failed in storage");
        }

        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Body is not valid JSON or does not match the expected shape
    #[error("Invalid request body: {message}")]
    InvalidJson { message: String },

    /// One or more fields violate a constraint
    #[error("Validation failed: {}", format_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Missing required argument (query parameter)
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    /// Argument present but unparseable
    #[error("Invalid value '{value}' for argument '{argument}'")]
    InvalidArgument { argument: String, value: String },

    /// Status outside the fixed enumeration
    #[error("Invalid status '{value}'")]
    InvalidStatus { value: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn format_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson { .. } => "INVALID_BODY",
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::MissingArgument { .. } => "MISSING_ARGUMENT",
            ValidationError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            ValidationError::InvalidStatus { .. } => "INVALID_STATUS",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for OrderError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OrderError::Validation(errors.into())
    }
}

/// Flatten nested validator output into `items[0].quantity`-style paths.
fn collect_field_errors(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<FieldValidationError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| FieldValidationError {
                    field: path.clone(),
                    message: e
                        .message
                        .clone()
                        .unwrap_or_else(|| Cow::Owned(e.code.to_string()))
                        .into_owned(),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_field_errors(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or the pool is exhausted
    #[error("storage connection error: {message}")]
    Connection { message: String },

    /// A statement failed to execute
    #[error("storage query error: {message}")]
    Query { message: String },

    /// Begin/commit/rollback failed
    #[error("storage transaction error: {message}")]
    Transaction { message: String },

    /// A constraint (primary key, foreign key) was violated or stored data is malformed
    #[error("storage integrity error: {message}")]
    Integrity { message: String },
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StorageError::Connection {
                message: err.to_string(),
            },
            sqlx::Error::Database(db)
                if db.is_foreign_key_violation() || db.is_unique_violation() =>
            {
                StorageError::Integrity {
                    message: err.to_string(),
                }
            }
            _ => StorageError::Query {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Persistence(err.into())
    }
}

/// A specialized Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;
