//! Refresh 토큰 바인딩
//!
//! 현재 유효한 refresh 토큰의 bcrypt 해시를 계정에 저장합니다.
//! 평문이 아니라 해시만 저장하므로 DB 스냅샷이 유출되어도 refresh 토큰을
//! 재사용할 수 없고, 새 해시를 쓰는 것만으로 이전 세션이 폐기됩니다.

use std::sync::Arc;

use crate::auth::local_auth::HASH_COST;
use crate::model::User;
use crate::tool::error::AppError;
use crate::traits::UserStore;

/// 계정당 하나의 refresh 토큰을 관리하는 바인더
pub struct RefreshTokenBinder {
    store: Arc<dyn UserStore>,
}

impl RefreshTokenBinder {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// refresh 토큰 해시를 계정에 저장합니다.
    ///
    /// 단일 update로 이전 값을 덮어씁니다. 같은 계정에 동시에 bind가
    /// 일어나면 마지막 쓰기가 이기고, 진 쪽의 토큰은 다음 갱신 시도에서
    /// `Unauthorized`로 걸러집니다.
    pub async fn bind(&self, email: &str, refresh_token: &str) -> Result<(), AppError> {
        let hash = bcrypt::hash(refresh_token, HASH_COST)?;
        self.store
            .update_refresh_token_hash(email, Some(&hash))
            .await
    }

    /// 제시된 refresh 토큰을 저장된 해시와 대조하고 계정을 반환합니다.
    ///
    /// 저장된 해시가 없거나 불일치하면 동일한 `Unauthorized`입니다.
    pub async fn verify_and_fetch(
        &self,
        refresh_token: &str,
        email: &str,
    ) -> Result<User, AppError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("refresh 토큰 불일치".to_string()))?;

        let stored_hash = user
            .refresh_token_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("refresh 토큰 불일치".to_string()))?;

        let matches = bcrypt::verify(refresh_token, stored_hash).unwrap_or(false);
        if !matches {
            return Err(AppError::Unauthorized("refresh 토큰 불일치".to_string()));
        }

        Ok(user)
    }

    /// 저장된 refresh 토큰 해시를 지웁니다 (로그아웃).
    ///
    /// 이미 해제된 계정에 다시 호출해도 에러가 아닙니다.
    pub async fn unbind(&self, email: &str) -> Result<(), AppError> {
        self.store.update_refresh_token_hash(email, None).await
    }
}
