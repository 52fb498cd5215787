use crate::shared::util::config;
use crate::shared::types::account::{Account, UserId};

use sqlx::Row;
use sqlx::postgres::PgPool;

#[derive(Clone)]
pub struct PostgresHandler {
    pool: PgPool
}

impl PostgresHandler {
    pub async fn new() -> Result<PostgresHandler, sqlx::Error> {
        Ok(PostgresHandler { pool: config::get_pool().await })
    }
}

impl PostgresHandler {
    // Called on first launch for setup
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(r#"
        CREATE TABLE IF NOT EXISTS users (
            id text primary key unique CHECK(length(id) < 25 and id ~ '^[a-zA-Z0-9_]+$'),
            name text NOT NULL CHECK(length(name) < 45),
            password_hash text NOT NULL
        );"#).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn can_login(&self, user_id: &UserId, mut password: &str) -> Result<bool, sqlx::Error> {
        // Too long password: replace password with a dummy and flag
        // that it should always be invalid
        let mut password_correct_override = true;
        if password.len() > config::get_config().count.max_password_length {
            password = "fake_password";
            password_correct_override = false;
        }

        let p = match sqlx::query("SELECT * FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).fetch_one(&self.pool).await {
            Ok(user) => user.get::<String, &str>("password_hash"),
            Err(_err) => "".to_string()
        };
        Ok(libpasta::verify_password(&p, password) && !password.is_empty() && password_correct_override)
    }

    pub async fn create_account(&self, user_id: &UserId, name: &str, password: &str) -> Result<(), sqlx::Error> {
        let password_hash = libpasta::hash_password(password);
        sqlx::query("INSERT INTO users(id, name, password_hash) VALUES($1, $2, $3);")
            .bind(user_id.to_lowercase()).bind(name).bind(password_hash)
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn change_password(&self, user_id: &UserId, password: &str) -> Result<(), sqlx::Error> {
        let password_hash = libpasta::hash_password(password);
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2;")
            .bind(password_hash).bind(user_id.to_lowercase())
            .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn delete_account(&self, user_id: &UserId) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Account, sqlx::Error> {
        let user = sqlx::query("SELECT * FROM users WHERE id = $1;")
            .bind(user_id.to_lowercase()).fetch_one(&self.pool).await?;
        Ok(Account {
            name: user.get::<String, &str>("name"),
            id: user.get::<String, &str>("id")
        })
    }
}
