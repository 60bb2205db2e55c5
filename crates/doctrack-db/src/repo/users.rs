use super::prelude::*;
use tracing::instrument;

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    #[instrument(
        level = "debug",
        skip(self, user),
        fields(username = %user.username, db.system = "postgresql", db.operation = "INSERT", db.query = "users.create")
    )]
    pub async fn create(&self, user: &NewUser) -> Result<User, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            INSERT INTO users (username, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, role, created_at
            "#,
            user.username.as_str(),
            user.email.as_str(),
            user.role.as_str()
        )
        .fetch_one(self.pool)
        .await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, username, email, role, created_at
            FROM users
            WHERE username = $1
            "#,
            username
        )
        .fetch_optional(self.pool)
        .await
    }

    pub async fn list(&self) -> Result<Vec<User>, sqlx_core::Error> {
        query_as!(
            User,
            r#"
            SELECT id, username, email, role, created_at
            FROM users
            ORDER BY id ASC
            "#
        )
        .fetch_all(self.pool)
        .await
    }

    #[instrument(
        level = "debug",
        skip(self),
        fields(db.system = "postgresql", db.operation = "SELECT", db.query = "users.list_by_roles")
    )]
    pub async fn list_by_roles(&self, roles: &[&str]) -> Result<Vec<User>, sqlx_core::Error> {
        let roles: Vec<String> = roles.iter().map(|role| (*role).to_string()).collect();
        query_as!(
            User,
            r#"
            SELECT id, username, email, role, created_at
            FROM users
            WHERE role = ANY($1)
            ORDER BY id ASC
            "#,
            roles
        )
        .fetch_all(self.pool)
        .await
    }
}
