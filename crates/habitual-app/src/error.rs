use salvo::{Depot, Request, Response, Writer, async_trait, http::StatusCode, writing::Json};
use serde::Serialize;
use thiserror::Error;

use habitual_db::error::DbError;
use habitual_service::error::ServiceError;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] DbError),

    #[error(transparent)]
    CoreError(#[from] habitual_core::error::CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

const INTERNAL: &str = "Internal server error";

fn diesel_status(err: &diesel::result::Error) -> (StatusCode, String) {
    use diesel::result::{DatabaseErrorKind, Error};

    match err {
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            (StatusCode::CONFLICT, "Resource already exists".to_string())
        }
        Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => (
            StatusCode::BAD_REQUEST,
            "Referenced resource not found".to_string(),
        ),
        Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string()),
    }
}

fn db_status(err: &DbError) -> (StatusCode, String) {
    match err {
        DbError::DatabaseError(e) => diesel_status(e),
        DbError::PoolError(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Database unavailable".to_string(),
        ),
        DbError::MigrationError(_) | DbError::CoreError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
        }
    }
}

impl AppError {
    /// ## Summary
    /// HTTP status and client-facing message for this error.
    ///
    /// Server-side failures get a generic message; their details are only logged.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::ServiceError(err) => match err {
                ServiceError::NotAuthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "Authentication required".to_string(),
                ),
                ServiceError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid email or password".to_string(),
                ),
                ServiceError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                ServiceError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                ServiceError::DieselError(e) => diesel_status(e),
                ServiceError::DatabaseError(e) => db_status(e),
                ServiceError::CoreError(_)
                | ServiceError::InvalidConfiguration(_)
                | ServiceError::InvariantViolation(_)
                | ServiceError::IoError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
                }
            },
            Self::DatabaseError(e) => db_status(e),
            Self::CoreError(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

#[async_trait]
impl Writer for AppError {
    async fn write(self, req: &mut Request, _depot: &mut Depot, res: &mut Response) {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(
                error = ?self,
                method = %req.method(),
                path = %req.uri().path(),
                "Request failed"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        res.status_code(status);
        res.render(Json(ErrorResponse { error: message }));
    }
}
