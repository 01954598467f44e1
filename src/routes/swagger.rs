use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::setup::AppState;
use crate::users::{
    permissions::Permission,
    roles::RoleDescriptor,
    User,
};

use super::{auth, health_check, role_routes, user_routes};

pub fn route() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check::live,
        health_check::health,
        role_routes::get_roles,
        role_routes::get_role_by_id,
        role_routes::get_role_by_level,
        auth::auth_signup,
        auth::auth_login,
        auth::auth_clear,
        user_routes::get_current_user,
        user_routes::get_users,
        user_routes::get_user_by_id,
        user_routes::patch_user_role,
    ),
    components(schemas(
        Permission,
        RoleDescriptor,
        User,
        auth::SignupRequest,
        auth::LoginRequest,
        user_routes::RolePatch,
    ))
)]
pub struct ApiDoc;
