use crate::{
    omni_error::OmniError,
    setup::AppState,
    users::{
        authorization::{
            authorize_role_change, can_view_admin, can_view_user, AuthorizationError,
        },
        roles::Role,
        User,
    },
};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

pub static USERS_TAG: &str = "users";

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route("/users/me", get(get_current_user))
        .route("/users/{id}", get(get_user_by_id))
        .route("/users/{id}/role", patch(patch_user_role))
}

#[derive(Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RolePatch {
    /// Identifier of the new role, case-insensitive.
    pub role: String,
}

/// Get the authenticated user
#[utoipa::path(get, path = "/users/me",
    responses(
        (status = 200, description = "Ok", body = User),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Stored role could not be resolved"),
        (status = 500, description = "Internal server error"),
    ),
    tag = USERS_TAG
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<User>, OmniError> {
    let user = User::authenticate(&headers, &cookies, &state.connection_pool).await?;
    Ok(Json(user))
}

/// List all users
///
/// Available from the Staff rank up. Highest ranks come first.
#[utoipa::path(get, path = "/users",
    responses(
        (status = 200, description = "Ok", body = Vec<User>),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Below the Staff rank"),
        (status = 500, description = "Internal server error"),
    ),
    tag = USERS_TAG
)]
pub async fn get_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
) -> Result<Json<Vec<User>>, OmniError> {
    let pool = &state.connection_pool;
    let user = User::authenticate(&headers, &cookies, pool).await?;
    if !can_view_admin(user.role) {
        return Err(AuthorizationError::BelowStaff)?;
    }

    match User::get_all(pool).await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            error!("Error listing users: {e}");
            Err(e)
        }
    }
}

/// Get a user
///
/// Anyone can see themselves. Seeing others requires the Staff rank.
#[utoipa::path(get, path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Ok", body = User),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Not permitted to see this user"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = USERS_TAG
)]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, OmniError> {
    let pool = &state.connection_pool;
    let user = User::authenticate(&headers, &cookies, pool).await?;
    if !can_view_user(&user, id) {
        return Err(AuthorizationError::BelowStaff)?;
    }
    if user.id == id {
        return Ok(Json(user));
    }
    Ok(Json(User::get_by_id(id, pool).await?))
}

/// Promote or demote a user
///
/// Requires the Staff rank and a rank strictly above the target's.
/// Only a Fondateur can grant the Fondateur rank. Nobody can change
/// their own rank.
#[utoipa::path(patch, path = "/users/{id}/role", request_body = RolePatch,
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Role replaced", body = User),
        (status = 401, description = "Authentication error"),
        (status = 403, description = "Permission denied"),
        (status = 404, description = "User or role not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = USERS_TAG
)]
pub async fn patch_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Json(body): Json<RolePatch>,
) -> Result<Json<User>, OmniError> {
    let pool = &state.connection_pool;
    let actor = User::authenticate(&headers, &cookies, pool).await?;
    let new_role = Role::get_by_id(&body.role)?;
    let target = User::get_by_id(id, pool).await?;

    if let Err(e) = authorize_role_change(&actor, &target, new_role) {
        warn!(
            "{} ({}) tried to make {} ({}) a {}: {e}",
            actor.username,
            actor.role.name(),
            target.username,
            target.role.name(),
            new_role.name()
        );
        return Err(e)?;
    }

    let previous = target.role;
    match target.update_role(new_role, pool).await {
        Ok(user) => {
            info!(
                "{} changed {} from {} to {}",
                actor.username,
                user.username,
                previous.name(),
                user.role.name()
            );
            Ok(Json(user))
        }
        Err(e) => {
            error!("Error updating role of user {id}: {e}");
            Err(e)
        }
    }
}
