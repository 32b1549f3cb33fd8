use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::result::DatabaseErrorKind;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    ConflictError(String),

    #[error("{0}")]
    AuthenticationError(String),

    #[error("{0}")]
    AuthorizationError(String),

    #[error("Database Error: {0}")]
    DatabaseError(String),

    #[error("Blocking Error: {0}")]
    BlockingError(String),

    #[error("Hashing Error: {0}")]
    HashingError(String),
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match self {
            CustomError::ValidationError(_)
            | CustomError::NotFoundError(_)
            | CustomError::ConflictError(_) => StatusCode::BAD_REQUEST,
            CustomError::AuthenticationError(_) | CustomError::AuthorizationError(_) => {
                StatusCode::UNAUTHORIZED
            }
            CustomError::DatabaseError(_)
            | CustomError::BlockingError(_)
            | CustomError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}

/******************************************/
// Translating diesel errors at the service boundary
/******************************************/
// Unique-constraint violations (users.email, the order_products primary key)
// surface as conflicts; everything else is an internal database error. Handlers
// that want a friendlier conflict message map the error themselves before `?`.
impl From<diesel::result::Error> for CustomError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                CustomError::ConflictError(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => CustomError::ConflictError(info.message().to_string()),
            diesel::result::Error::NotFound => {
                CustomError::NotFoundError("Record not found".to_string())
            }
            other => CustomError::DatabaseError(other.to_string()),
        }
    }
}
