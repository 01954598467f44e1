use axum::{extract::Path, routing::get, Json, Router};
use strum::VariantArray;

use crate::{
    omni_error::OmniError,
    setup::AppState,
    users::roles::{Role, RoleDescriptor},
};

pub static ROLES_TAG: &str = "roles";

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/roles", get(get_roles))
        .route("/roles/{id}", get(get_role_by_id))
        .route("/roles/level/{level}", get(get_role_by_level))
}

/// List every rank, lowest first
///
/// Public. Frontends use it to render badges and promotion menus.
#[utoipa::path(get, path = "/roles",
    responses((status = 200, description = "Ok", body = Vec<RoleDescriptor>)),
    tag = ROLES_TAG
)]
pub async fn get_roles() -> Json<Vec<RoleDescriptor>> {
    Json(Role::VARIANTS.iter().map(|role| role.descriptor()).collect())
}

/// Get a rank by its identifier
///
/// The identifier is matched case-insensitively.
#[utoipa::path(get, path = "/roles/{id}",
    params(("id" = String, Path, description = "Role identifier, e.g. \"staff\"")),
    responses(
        (status = 200, description = "Ok", body = RoleDescriptor),
        (status = 404, description = "No such role"),
    ),
    tag = ROLES_TAG
)]
pub async fn get_role_by_id(Path(id): Path<String>) -> Result<Json<RoleDescriptor>, OmniError> {
    Ok(Json(Role::get_by_id(&id)?.descriptor()))
}

/// Get the rank sitting at a level
#[utoipa::path(get, path = "/roles/level/{level}",
    params(("level" = i32, Path, description = "Role level, e.g. 80")),
    responses(
        (status = 200, description = "Ok", body = RoleDescriptor),
        (status = 404, description = "No role occupies this level"),
    ),
    tag = ROLES_TAG
)]
pub async fn get_role_by_level(Path(level): Path<i32>) -> Result<Json<RoleDescriptor>, OmniError> {
    Ok(Json(Role::get_by_level(level)?.descriptor()))
}
