//! Common trait definitions for dependency injection
//!
//! All collaborators are defined as traits to enable:
//! - Dependency injection
//! - Easy testing with in-memory implementations
//! - Loose coupling between components

use async_trait::async_trait;

use crate::model::{NewUser, User, UserUpdate};
use crate::tool::error::AppError;

// ============================================================================
// USER STORE
// ============================================================================

/// 계정 저장소 capability
///
/// 코어는 read-after-write 일관성을 전제합니다. refresh 토큰 해시의
/// 교체는 단일 update로 수행되며, 동시 갱신 시 마지막 쓰기가 이깁니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_kakao_id(&self, kakao_id: i64) -> Result<Option<User>, AppError>;
    async fn create(&self, new_user: &NewUser) -> Result<User, AppError>;
    /// 현재 유효한 refresh 토큰 해시를 교체합니다. `None`은 해제(로그아웃).
    async fn update_refresh_token_hash(
        &self,
        email: &str,
        hash: Option<&str>,
    ) -> Result<(), AppError>;
    async fn update(&self, email: &str, changes: &UserUpdate) -> Result<User, AppError>;
}

// ============================================================================
// VERIFICATION CODE STORE
// ============================================================================

/// 전화번호별 인증번호 저장소 capability
///
/// 키 하나 단위의 set/get/delete만 사용하므로 키 간 조정은 필요 없습니다.
/// 만료는 저장소의 TTL 방출에 맡깁니다.
#[async_trait]
pub trait CodeStore: Send + Sync {
    async fn set(&self, phone_number: &str, code: &str, ttl_secs: u64) -> Result<(), AppError>;
    async fn get(&self, phone_number: &str) -> Result<Option<String>, AppError>;
    async fn delete(&self, phone_number: &str) -> Result<(), AppError>;
}

// ============================================================================
// SMS GATEWAY
// ============================================================================

/// 외부 SMS 게이트웨이 capability
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// 문자 1건을 발송합니다. 게이트웨이 오류는 `AppError::ExternalApi`.
    async fn send(&self, phone_number: &str, content: &str) -> Result<(), AppError>;
}
