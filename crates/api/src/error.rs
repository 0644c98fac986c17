use axum::extract::path::ErrorKind;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use storefront_core::error::{CoreError, FieldError};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON error body
/// `{ "code": ..., "errors": [{ "message": ..., "field": ... }] }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `storefront_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body failed `validator` rules.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, errors) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                // Missing resources are reported as a bad request.
                CoreError::NotFound { entity, id } => (
                    StatusCode::BAD_REQUEST,
                    "NOT_FOUND",
                    vec![FieldError::general(format!("{entity} with id {id} not found"))],
                ),
                CoreError::Validation(errors) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", errors)
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    vec![FieldError::general(msg)],
                ),
                CoreError::Forbidden(msg) => (
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    vec![FieldError::general(msg)],
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(&err),

            // --- HTTP-specific errors ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                flatten_validation_errors(&errors),
            ),
        };

        let body = json!({
            "code": code,
            "errors": errors,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, Vec<FieldError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        vec![FieldError::general(INTERNAL_MESSAGE)],
    )
}

/// One [`FieldError`] per failed rule, ordered by field name.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid ({})", e.code));
                FieldError::new(field.to_string(), message)
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        malformed(serde_error_field(&message), message)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        malformed(serde_error_field(&message), message)
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let field = match &rejection {
            PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
                ErrorKind::ParseErrorAtKey { key, .. }
                | ErrorKind::DeserializeError { key, .. }
                | ErrorKind::InvalidUtf8InPathParam { key } => Some(key.clone()),
                _ => None,
            },
            _ => None,
        };
        malformed(field, rejection.body_text())
    }
}

fn malformed(field: Option<String>, message: String) -> AppError {
    let error = match field {
        Some(field) => FieldError::new(field, message),
        None => FieldError::general(message),
    };
    AppError::Core(CoreError::Validation(vec![error]))
}

/// Field named in a serde error, either `missing field `x`` or a leading `path: `.
fn serde_error_field(body_text: &str) -> Option<String> {
    let detail = ["target type: ", "query string: "]
        .iter()
        .find_map(|prefix| body_text.split_once(prefix).map(|(_, rest)| rest))
        .unwrap_or(body_text);

    if let Some(rest) = detail.strip_prefix("missing field `") {
        return rest.split_once('`').map(|(field, _)| field.to_string());
    }

    let (path, _) = detail.split_once(": ")?;
    let is_path = !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
    is_path.then(|| path.to_string())
}

// ---------------------------------------------------------------------------
// Database errors
// ---------------------------------------------------------------------------

/// Classify a sqlx error into an HTTP status, error code, and messages.
///
/// - `RowNotFound` maps to 400 `NOT_FOUND`.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 400 `NOT_FOUND`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, Vec<FieldError>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::BAD_REQUEST,
            "NOT_FOUND",
            vec![FieldError::general("Resource not found")],
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        vec![FieldError::general(format!(
                            "Duplicate value violates unique constraint: {constraint}"
                        ))],
                    );
                }
            }
            // PostgreSQL foreign key violation: the referenced row is gone
            if db_err.code().as_deref() == Some("23503") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::BAD_REQUEST,
                    "NOT_FOUND",
                    vec![missing_reference(constraint)],
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn missing_reference(constraint: &str) -> FieldError {
    match constraint {
        "product_ratings_product_id_fkey" => FieldError::general("Product not found"),
        "products_category_id_fkey" => FieldError::new("category_id", "Category not found"),
        other => FieldError::general(format!("Referenced row not found ({other})")),
    }
}
