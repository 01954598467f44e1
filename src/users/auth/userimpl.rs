use super::{
    cookie::set_session_token_cookie, error::AuthError, session::Session,
    AUTH_SESSION_COOKIE_NAME,
};
use crate::{omni_error::OmniError, users::User};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{prelude::BASE64_STANDARD, Engine};
use sqlx::{Pool, Postgres};
use tower_cookies::Cookies;

impl User {
    /// Resolves the caller from a `Bearer` or `Basic` AUTHORIZATION header,
    /// falling back to the session cookie. The header wins when both exist.
    pub async fn authenticate(
        headers: &HeaderMap,
        cookies: &Cookies,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let cookie = cookies
            .get(AUTH_SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|value| !value.is_empty());
        let header = match headers.get(AUTHORIZATION) {
            Some(header) => match header.to_str() {
                Ok(header) => Some(header.to_string()),
                Err(_) => return Err(AuthError::NonAsciiHeaderCharacters)?,
            },
            None => None,
        };

        match (cookie, header) {
            (None, None) => Err(AuthError::NoCredentials)?,
            (_, Some(header)) => {
                let (scheme, data) = match header.split_once(' ') {
                    Some((a, b)) => (a, b),
                    None => return Err(AuthError::BadHeaderAuthSchemeData)?,
                };
                match scheme {
                    "Basic" => User::auth_via_b64_credentials(data, pool).await,
                    "Bearer" => User::auth_via_session(data, cookies, pool).await,
                    _ => Err(AuthError::UnsupportedHeaderAuthScheme)?,
                }
            }
            (Some(cookie), None) => User::auth_via_session(&cookie, cookies, pool).await,
        }
    }

    async fn auth_via_b64_credentials(
        data: &str,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let decoded = String::from_utf8(BASE64_STANDARD.decode(data)?)?;
        let (username, password) = match decoded.split_once(':') {
            Some(pair) => pair,
            None => return Err(AuthError::NoBasicAuthColonSplit)?,
        };
        User::auth_via_credentials(username, password, pool).await
    }

    pub async fn auth_via_credentials(
        username: &str,
        password: &str,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let hash: String =
            match sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(pool)
                .await
            {
                Ok(hash) => hash,
                Err(sqlx::Error::RowNotFound) => return Err(AuthError::InvalidCredentials)?,
                Err(e) => return Err(e)?,
            };
        let hash = PasswordHash::new(&hash)?;

        match Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
        {
            true => User::get_by_username(username, pool).await,
            false => Err(AuthError::InvalidCredentials)?,
        }
    }

    pub async fn auth_via_session(
        token: &str,
        cookies: &Cookies,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let session = match Session::get_by_token(token, pool).await {
            Ok(session) => session,
            Err(OmniError::ResourceNotFoundError) => Err(AuthError::InvalidCredentials)?,
            Err(e) => return Err(e),
        };
        if session.expired() {
            return Err(AuthError::SessionExpired)?;
        }

        let user = User::get_by_id(session.user_id, pool).await?;
        session.prolong_and_update_last_access(pool).await?;
        set_session_token_cookie(token, cookies);
        Ok(user)
    }
}
