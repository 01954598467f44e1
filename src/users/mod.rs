use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use authorization::AuthorizationError;
use permissions::Permission;
use roles::{Role, RoleRef};

pub mod auth;
pub mod authorization;
pub mod founder;
pub mod permissions;
pub mod queries;
pub mod roles;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[schema(value_type = String, example = "recrue")]
    pub role: Role,
}

impl User {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }
}

/// Users table row. The role is stored as a reference and only becomes a
/// [`Role`] once it resolves.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role_id: String,
    pub role_level: i32,
}

impl TryFrom<UserRow> for User {
    type Error = AuthorizationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let reference = RoleRef {
            id: row.role_id,
            level: row.role_level,
        };
        let role = match reference.resolve() {
            Ok(role) => role,
            Err(e) => {
                warn!("User {} holds an unresolvable role: {e}", row.id);
                return Err(AuthorizationError::UnresolvedRole);
            }
        };
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            role,
        })
    }
}

#[test]
fn row_with_valid_role_converts() {
    let row = UserRow {
        id: Uuid::now_v7(),
        username: String::from("gov"),
        email: String::from("gov@ngmanager.test"),
        role_id: String::from("gouverneur"),
        role_level: 60,
    };
    let user = User::try_from(row).unwrap();
    assert_eq!(user.role, Role::Gouverneur);
    assert!(user.has_permission(Permission::ManageCountry));
    assert!(!user.has_permission(Permission::ManageUsers));
}

#[test]
fn row_with_stale_role_is_denied() {
    let row = UserRow {
        id: Uuid::now_v7(),
        username: String::from("sneaky"),
        email: String::from("sneaky@ngmanager.test"),
        role_id: String::from("fondateur"),
        role_level: 10,
    };
    assert_eq!(
        User::try_from(row).unwrap_err(),
        AuthorizationError::UnresolvedRole
    );
}
