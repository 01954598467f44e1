use super::{roles::Role, User, UserRow};
use crate::omni_error::OmniError;
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use sqlx::{Pool, Postgres};
use tracing::warn;
use uuid::Uuid;

impl User {
    pub async fn get_by_id(id: Uuid, pool: &Pool<Postgres>) -> Result<User, OmniError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, role_id, role_level FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(User::try_from(row)?)
    }

    pub async fn get_by_username(
        username: &str,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, role_id, role_level FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(pool)
        .await?;
        Ok(User::try_from(row)?)
    }

    /// Rows whose role reference does not resolve are left out.
    pub async fn get_all(pool: &Pool<Postgres>) -> Result<Vec<User>, OmniError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, email, role_id, role_level FROM users
            ORDER BY role_level DESC, username",
        )
        .fetch_all(pool)
        .await?;
        let users: Vec<User> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match User::try_from(row) {
                    Ok(user) => Some(user),
                    Err(e) => {
                        warn!("Skipping user {id} in listing: {e}");
                        None
                    }
                }
            })
            .collect();
        Ok(users)
    }

    pub async fn post(
        user: User,
        password: String,
        pool: &Pool<Postgres>,
    ) -> Result<User, OmniError> {
        let hash = User::generate_password_hash(&password)?;
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role_id, role_level)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(hash)
        .bind(user.role.id())
        .bind(user.role.level())
        .execute(pool)
        .await?;
        Ok(user)
    }

    /// Replaces the stored role reference wholesale.
    pub async fn update_role(self, role: Role, pool: &Pool<Postgres>) -> Result<User, OmniError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET role_id = $1, role_level = $2 WHERE id = $3
            RETURNING id, username, email, role_id, role_level",
        )
        .bind(role.id())
        .bind(role.level())
        .bind(self.id)
        .fetch_one(pool)
        .await?;
        Ok(User::try_from(row)?)
    }

    pub fn generate_password_hash(password: &str) -> Result<String, OmniError> {
        let argon = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        Ok(argon.hash_password(password.as_bytes(), &salt)?.to_string())
    }
}

#[test]
fn password_hashes_are_salted() {
    let a = User::generate_password_hash("hunter22").unwrap();
    let b = User::generate_password_hash("hunter22").unwrap();
    assert_ne!(a, b);
    assert!(a.starts_with("$argon2"));
}
