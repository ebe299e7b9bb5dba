//! MySQL 사용자 저장소
//!
//! users 테이블 스키마 (email은 UNIQUE 제약):
//! `users(user_id PK AUTO_INCREMENT, email UNIQUE, username, phone_number,
//!  password_hash, refresh_token_hash NULL, kakao_id NULL)`
//!
//! 중복 이메일 INSERT는 MySQL 1062로 실패하고 `AppError::Conflict`로
//! 변환됩니다. refresh 해시 교체는 단일 UPDATE이므로 동시 로그인 시
//! 마지막 쓰기가 이깁니다.

use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::info;

use crate::config::DbConfig;
use crate::model::{NewUser, User, UserUpdate};
use crate::tool::error::AppError;
use crate::traits::UserStore;

const USER_COLUMNS: &str =
    "user_id, email, username, phone_number, password_hash, refresh_token_hash, kakao_id";

/// MySQL 기반 UserStore 구현
#[derive(Clone)]
pub struct MySqlUserStore {
    pool: MySqlPool,
}

impl MySqlUserStore {
    pub fn new(config: &DbConfig) -> Self {
        Self {
            pool: config.pool.clone(),
        }
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE kakao_id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(kakao_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (email, username, phone_number, password_hash, kakao_id) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.phone_number)
        .bind(&new_user.password_hash)
        .bind(new_user.kakao_id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        let user_id = result.last_insert_id() as i64;
        info!("사용자 생성: user_id={}", user_id);

        Ok(User {
            user_id,
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            phone_number: new_user.phone_number.clone(),
            password_hash: new_user.password_hash.clone(),
            refresh_token_hash: None,
            kakao_id: new_user.kakao_id,
        })
    }

    async fn update_refresh_token_hash(
        &self,
        email: &str,
        hash: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token_hash = ? WHERE email = ?")
            .bind(hash)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn update(&self, email: &str, changes: &UserUpdate) -> Result<User, AppError> {
        sqlx::query(
            "UPDATE users SET username = COALESCE(?, username), \
             phone_number = COALESCE(?, phone_number) WHERE email = ?",
        )
        .bind(changes.username.as_deref())
        .bind(changes.phone_number.as_deref())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        self.find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))
    }
}
