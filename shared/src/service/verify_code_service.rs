//! 전화번호 인증 서비스
//!
//! 인증번호 발송과 확인을 담당합니다. 토큰 수명주기와는 독립적인
//! 부채널이며, 캐시와 SMS 게이트웨이는 주입받아 사용합니다.

use std::sync::Arc;

use tracing::info;

use crate::tool::error::AppError;
use crate::tool::random_code::{numeric_code, AUTH_CODE_LEN};
use crate::traits::{CodeStore, SmsGateway};

/// 인증번호 발송/확인 서비스
pub struct PhoneVerifyService {
    cache: Arc<dyn CodeStore>,
    gateway: Arc<dyn SmsGateway>,
    code_ttl_secs: u64,
}

impl PhoneVerifyService {
    pub fn new(cache: Arc<dyn CodeStore>, gateway: Arc<dyn SmsGateway>, code_ttl_secs: u64) -> Self {
        Self {
            cache,
            gateway,
            code_ttl_secs,
        }
    }

    /// 인증번호를 발송하고 캐시에 저장합니다.
    ///
    /// 순서가 중요합니다:
    /// 1. 이전 인증번호 삭제 (재발송 시 옛 코드가 통과하는 것을 방지)
    /// 2. 새 코드 생성 후 게이트웨이로 발송
    /// 3. 발송이 성공한 경우에만 TTL과 함께 저장
    ///
    /// 발송 실패 시 캐시에는 아무것도 남지 않습니다. 사용자가 받지 못한
    /// 코드가 유효해지는 일은 없습니다.
    pub async fn send_code(&self, phone_number: &str) -> Result<String, AppError> {
        self.cache.delete(phone_number).await?;

        let code = numeric_code(AUTH_CODE_LEN);
        let content = format!("인증번호는 [{code}]입니다.");

        self.gateway.send(phone_number, &content).await?;
        self.cache.set(phone_number, &code, self.code_ttl_secs).await?;

        info!("인증번호 발송: to={}", phone_number);
        Ok(code)
    }

    /// 제출된 인증번호를 확인합니다. 읽기 전용입니다.
    ///
    /// 캐시에 항목이 없거나 값이 다르면 `false`입니다. 에러가 아닙니다.
    /// 일치해도 항목을 지우지 않으므로 TTL 안에서는 재확인이 가능하고,
    /// 만료는 캐시 TTL 방출에 맡깁니다.
    pub async fn check_code(&self, phone_number: &str, submitted: &str) -> Result<bool, AppError> {
        let cached = self.cache.get(phone_number).await?;
        Ok(cached.as_deref() == Some(submitted))
    }
}
