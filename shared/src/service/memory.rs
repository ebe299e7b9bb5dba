//! In-memory 저장소 구현
//!
//! 테스트와 로컬 개발에서 MySQL/Redis 없이 코어 흐름을 돌릴 때
//! 사용합니다. 트레이트 계약(중복 충돌, TTL 만료, 마지막 쓰기 우선)은
//! 프로덕션 구현과 동일하게 지킵니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::model::{NewUser, User, UserUpdate};
use crate::tool::error::AppError;
use crate::traits::{CodeStore, UserStore};

/// 이메일을 키로 쓰는 인메모리 사용자 저장소
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// 저장된 계정 수 (테스트 검증용)
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.kakao_id == Some(kakao_id))
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if users.contains_key(&new_user.email) {
            return Err(AppError::Conflict(
                "Username has already been taken".to_string(),
            ));
        }

        let user = User {
            user_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            phone_number: new_user.phone_number.clone(),
            password_hash: new_user.password_hash.clone(),
            refresh_token_hash: None,
            kakao_id: new_user.kakao_id,
        };

        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update_refresh_token_hash(
        &self,
        email: &str,
        hash: Option<&str>,
    ) -> Result<(), AppError> {
        // UPDATE가 0행에 적용되어도 에러가 아닌 SQL 의미론을 따른다
        if let Some(user) = self.users.write().await.get_mut(email) {
            user.refresh_token_hash = hash.map(str::to_string);
        }
        Ok(())
    }

    async fn update(&self, email: &str, changes: &UserUpdate) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(email)
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))?;

        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(phone_number) = &changes.phone_number {
            user.phone_number = phone_number.clone();
        }

        Ok(user.clone())
    }
}

/// TTL을 흉내 내는 인메모리 인증번호 저장소
#[derive(Default)]
pub struct MemoryCodeStore {
    entries: RwLock<HashMap<String, (String, i64)>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn set(&self, phone_number: &str, code: &str, ttl_secs: u64) -> Result<(), AppError> {
        let expires_at = Utc::now().timestamp() + ttl_secs as i64;
        self.entries
            .write()
            .await
            .insert(phone_number.to_string(), (code.to_string(), expires_at));
        Ok(())
    }

    async fn get(&self, phone_number: &str) -> Result<Option<String>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries.get(phone_number).and_then(|(code, expires_at)| {
            if *expires_at > Utc::now().timestamp() {
                Some(code.clone())
            } else {
                None
            }
        }))
    }

    async fn delete(&self, phone_number: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(phone_number);
        Ok(())
    }
}
