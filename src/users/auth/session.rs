use super::{
    crypto::{generate_token, hash_token},
    AUTH_SESSION_LENGTH,
};
use crate::omni_error::OmniError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub issued: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub last_access: Option<DateTime<Utc>>,
}

impl Session {
    pub fn expired(&self) -> bool {
        self.expiry < Utc::now()
    }

    /// Returns the session alongside the plaintext token, which is not
    /// kept anywhere else.
    pub async fn create(
        user_id: Uuid,
        pool: &Pool<Postgres>,
    ) -> Result<(Session, String), OmniError> {
        let token = generate_token();
        let now = Utc::now();
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, token, user_id, issued, expiry)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, issued, expiry, last_access",
        )
        .bind(Uuid::now_v7())
        .bind(hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(now + AUTH_SESSION_LENGTH)
        .fetch_one(pool)
        .await?;
        Ok((session, token))
    }

    pub async fn get_by_token(token: &str, pool: &Pool<Postgres>) -> Result<Session, OmniError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, issued, expiry, last_access FROM sessions WHERE token = $1",
        )
        .bind(hash_token(token))
        .fetch_one(pool)
        .await?;
        Ok(session)
    }

    /// Prolongs session expiry by a week and updates last_access at once
    pub async fn prolong_and_update_last_access(
        self,
        pool: &Pool<Postgres>,
    ) -> Result<Session, OmniError> {
        let now = Utc::now();
        let expiry = now + AUTH_SESSION_LENGTH;
        sqlx::query("UPDATE sessions SET expiry = $2, last_access = $3 WHERE id = $1")
            .bind(self.id)
            .bind(expiry)
            .bind(now)
            .execute(pool)
            .await?;
        Ok(Session {
            expiry,
            last_access: Some(now),
            ..self
        })
    }

    pub async fn destroy(self, pool: &Pool<Postgres>) -> Result<(), OmniError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(self.id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[test]
fn session_expiry() {
    let now = Utc::now();
    let fresh = Session {
        id: Uuid::now_v7(),
        user_id: Uuid::now_v7(),
        issued: now,
        expiry: now + AUTH_SESSION_LENGTH,
        last_access: None,
    };
    assert!(!fresh.expired());

    let stale = Session {
        expiry: now - chrono::Duration::minutes(1),
        ..fresh
    };
    assert!(stale.expired());
}
