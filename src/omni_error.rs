use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(thiserror::Error, Debug)]
pub enum OmniError {
    #[error("{message}")]
    ExplicitError { status: StatusCode, message: String },
    #[error("AuthError: {0}")]
    AuthError(#[from] crate::users::auth::error::AuthError),
    #[error("AuthorizationError: {0}")]
    AuthorizationError(#[from] crate::users::authorization::AuthorizationError),
    #[error("RoleError: {0}")]
    RoleError(#[from] crate::users::roles::RoleError),
    #[error("Resource not found")]
    ResourceNotFoundError,
    #[error("Resource already exists")]
    ResourceAlreadyExistsError,

    #[error("sqlx::Error: {0}")]
    SqlxError(sqlx::Error),
    #[error("base64::DecodeError: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),
    #[error("std::string::FromUtf8Error: {0}")]
    FromUtf8Error(#[from] std::string::FromUtf8Error),

    // this doesn't implement Error for some reason
    #[error("argon2::password_hash::Error: {0}")]
    PassHashError(String),
}

impl OmniError {
    pub fn bad_request(message: &str) -> Self {
        OmniError::ExplicitError {
            status: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        use OmniError::*;
        match self {
            ExplicitError { status, .. } => *status,
            AuthError(e) => e.status_code(),
            AuthorizationError(e) => e.status_code(),
            RoleError(_) | ResourceNotFoundError => StatusCode::NOT_FOUND,
            ResourceAlreadyExistsError => StatusCode::CONFLICT,
            SqlxError(_) | Base64DecodeError(_) | FromUtf8Error(_) | PassHashError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn respond(self) -> Response {
        use OmniError::*;
        let status = self.status_code();
        match self {
            ExplicitError { message, .. } => (status, message).into_response(),
            AuthError(e) => (status, e.to_string()).into_response(),
            AuthorizationError(_) => (status, "Permission denied.").into_response(),
            RoleError(e) => (status, e.to_string()).into_response(),
            ResourceNotFoundError | ResourceAlreadyExistsError => {
                (status, self.to_string()).into_response()
            }
            SqlxError(_) | Base64DecodeError(_) | FromUtf8Error(_) | PassHashError(_) => {
                error!("{self}");
                (status, self.clerr()).into_response()
            }
        }
    }

    // clerr shall henceforth stand for client facing error message
    fn clerr(&self) -> String {
        use OmniError::*;
        match self {
            SqlxError(_) => "SQL/SQLx failure.",
            Base64DecodeError(_) => "Base64 decoding failure.",
            FromUtf8Error(_) => "UTF8 decoding failure.",
            PassHashError(_) => "Password hash failure.",
            _ => "Internal server error.",
        }
        .to_string()
    }
}

impl IntoResponse for OmniError {
    fn into_response(self) -> Response {
        self.respond()
    }
}

impl From<sqlx::Error> for OmniError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = e {
            return OmniError::ResourceNotFoundError;
        }
        let unique_violation = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        match unique_violation {
            true => OmniError::ResourceAlreadyExistsError,
            false => OmniError::SqlxError(e),
        }
    }
}

impl From<argon2::password_hash::Error> for OmniError {
    fn from(e: argon2::password_hash::Error) -> Self {
        OmniError::PassHashError(e.to_string())
    }
}

#[test]
fn status_codes() {
    use crate::users::{
        auth::error::AuthError, authorization::AuthorizationError, roles::RoleError,
    };

    assert_eq!(
        OmniError::from(AuthError::NoCredentials).status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        OmniError::from(AuthorizationError::TopRoleReserved).status_code(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        OmniError::from(RoleError::NotFound("level 50".into())).status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        OmniError::from(sqlx::Error::RowNotFound).status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        OmniError::from(sqlx::Error::PoolTimedOut).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        OmniError::bad_request("nope").status_code(),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn authorization_failures_read_as_permission_denied() {
    use crate::users::authorization::AuthorizationError;

    let response = OmniError::from(AuthorizationError::UnresolvedRole).respond();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
