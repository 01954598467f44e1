use crate::{
    omni_error::OmniError,
    setup::AppState,
    users::{
        auth::{
            cookie::{clear_session_token_cookie, set_session_token_cookie},
            error::AuthError::{
                BadHeaderAuthSchemeData, ClearSessionBearerOnly, NonAsciiHeaderCharacters,
            },
            session::Session,
            AUTH_SESSION_COOKIE_NAME,
        },
        roles::Role,
        User,
    },
};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sqlx::{Pool, Postgres};
use tower_cookies::Cookies;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

pub static AUTH_TAG: &str = "auth";

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_USERNAME_LENGTH: usize = 32;

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth_signup))
        .route("/auth/login", post(auth_login))
        .route("/auth/clear", get(auth_clear))
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    username: String,
    email: String,
    password: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), OmniError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > MAX_USERNAME_LENGTH {
            return Err(OmniError::bad_request("Username must be 1 to 32 characters long."));
        }
        if username.contains(':') {
            return Err(OmniError::bad_request("Username must not contain a colon."));
        }
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => (),
            _ => return Err(OmniError::bad_request("Invalid email address.")),
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(OmniError::bad_request("Password must be at least 8 characters long."));
        }
        Ok(())
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// Register a new account
///
/// Every new account starts out as a Recrue.
#[utoipa::path(post, path = "/auth/signup", request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Username or email already taken"),
        (status = 500, description = "Internal server error"),
    ),
    tag = AUTH_TAG
)]
pub async fn auth_signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Response, OmniError> {
    body.validate()?;
    let user = User {
        id: Uuid::now_v7(),
        username: body.username.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        role: Role::Recrue,
    };
    match User::post(user, body.password, &state.connection_pool).await {
        Ok(user) => {
            info!("New account registered: {}", user.username);
            Ok((StatusCode::CREATED, Json(user)).into_response())
        }
        Err(e) => {
            error!("Error registering a new account: {e}");
            Err(e)
        }
    }
}

/// Log in
///
/// Returns an auth token and sets a session cookie.
/// Providing the token either in a Bearer header or through the cookie
/// is required to perform any further authenticated operations.
#[utoipa::path(post, path = "/auth/login", request_body = LoginRequest,
    responses(
        (status = 200, description = "Auth token", body = String,
            example = json!("UaKN-h7_eD5LlKt8ba4P376G0LGvW3JmccCDMUaPaQk")),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    ),
    tag = AUTH_TAG
)]
pub async fn auth_login(
    cookies: Cookies,
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, OmniError> {
    let pool = &state.connection_pool;
    let user = User::auth_via_credentials(&body.username, &body.password, pool).await?;
    let (_, token) = Session::create(user.id, pool).await?;

    set_session_token_cookie(&token, &cookies);
    Ok((StatusCode::OK, token).into_response())
}

const TOO_MANY_TOKENS: &str = "Please provide one session token to destroy at a time.";
const NO_TOKENS: &str = "Please provide a session token to destroy.";
const SESSION_DESTROYED: &str = "Logged out - Session destroyed";

/// Log out
///
/// Invalidates the session given either as a Bearer token or as the
/// session cookie, one at a time.
#[utoipa::path(get, path = "/auth/clear",
    responses(
        (status = 200, description = SESSION_DESTROYED),
        (status = 400, description = "Bad request"),
        (status = 404, description = "No such session"),
        (status = 500, description = "Internal server error"),
    ),
    tag = AUTH_TAG
)]
pub async fn auth_clear(
    headers: HeaderMap,
    cookies: Cookies,
    State(state): State<AppState>,
) -> Result<Response, OmniError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(h) => match h.to_str() {
            Ok(t) => Some(t.to_string()),
            Err(_) => return Err(NonAsciiHeaderCharacters)?,
        },
        None => None,
    };
    let bearer = match header {
        Some(h) => match h.split_once(' ') {
            Some(("Bearer", token)) => Some(token.to_string()),
            Some(_) => return Err(ClearSessionBearerOnly)?,
            None => return Err(BadHeaderAuthSchemeData)?,
        },
        None => None,
    };
    let cookie = cookies
        .get(AUTH_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|c| !c.is_empty() && Some(c) != bearer.as_ref());

    match (bearer, cookie) {
        (Some(_), Some(_)) => Ok((StatusCode::BAD_REQUEST, TOO_MANY_TOKENS).into_response()),
        (Some(token), None) | (None, Some(token)) => {
            destroy_session(&token, &cookies, &state.connection_pool).await
        }
        (None, None) => Ok((StatusCode::BAD_REQUEST, NO_TOKENS).into_response()),
    }
}

async fn destroy_session(
    token: &str,
    cookies: &Cookies,
    pool: &Pool<Postgres>,
) -> Result<Response, OmniError> {
    clear_session_token_cookie(cookies);
    Session::get_by_token(token, pool).await?.destroy(pool).await?;
    Ok((StatusCode::OK, SESSION_DESTROYED).into_response())
}

#[cfg(test)]
mod tests {
    use super::SignupRequest;

    fn request(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn signup_validation() {
        assert!(request("gouv", "gouv@ng.fr", "longenough").validate().is_ok());
        assert!(request("  ", "gouv@ng.fr", "longenough").validate().is_err());
        assert!(request("a:b", "gouv@ng.fr", "longenough").validate().is_err());
        assert!(request("gouv", "gouv.ng.fr", "longenough").validate().is_err());
        assert!(request("gouv", "@ng.fr", "longenough").validate().is_err());
        assert!(request("gouv", "gouv@ng.fr", "short").validate().is_err());
        assert!(request(&"x".repeat(33), "gouv@ng.fr", "longenough").validate().is_err());
    }
}
