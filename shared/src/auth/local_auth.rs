//! 이메일/비밀번호 인증 서비스
//!
//! 자격 증명 검증과 회원가입을 담당합니다. 계정 조회는 주입받은
//! 저장소에 위임하고, 비밀번호 비교는 bcrypt 해시 비교로 수행합니다.

use std::sync::Arc;

use tracing::info;

use crate::model::{NewUser, RegisterInput, UserSummary};
use crate::tool::error::{helpers, AppError};
use crate::traits::UserStore;

/// bcrypt cost factor
pub const HASH_COST: u32 = 10;

/// 이메일/비밀번호 인증 서비스
pub struct LocalAuthService {
    store: Arc<dyn UserStore>,
}

impl LocalAuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// 이메일/비밀번호를 검증합니다. 읽기 전용입니다.
    ///
    /// 계정이 없는 경우와 비밀번호가 틀린 경우를 구분하지 않고 동일한
    /// `Unauthorized`를 반환합니다. 응답 형태로 계정 존재 여부를 추측할
    /// 수 없어야 합니다.
    pub async fn validate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, AppError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                return Err(AppError::Unauthorized(
                    "일치하는 사용자 정보를 찾지 못하였습니다".to_string(),
                ))
            }
        };

        let is_valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !is_valid {
            return Err(AppError::Unauthorized(
                "일치하는 사용자 정보를 찾지 못하였습니다".to_string(),
            ));
        }

        Ok(user.summary())
    }

    /// 회원가입을 처리합니다.
    ///
    /// 비밀번호는 bcrypt(cost 10)로 해시해서 저장소에 넘깁니다.
    /// 이메일/닉네임 중복은 저장소가 `Conflict`로 보고합니다.
    pub async fn register(&self, input: RegisterInput) -> Result<UserSummary, AppError> {
        validate_register_input(&input)?;

        let password_hash = bcrypt::hash(&input.password, HASH_COST)?;
        let user = self
            .store
            .create(&NewUser {
                email: input.email,
                username: input.username,
                phone_number: input.phone_number,
                password_hash,
                kakao_id: None,
            })
            .await?;

        info!("회원가입 완료: user_id={}", user.user_id);
        Ok(user.summary())
    }
}

/// 회원가입 입력을 검증합니다.
///
/// 전화번호는 010-0000-0000 형태(13자)만 허용합니다.
fn validate_register_input(input: &RegisterInput) -> Result<(), AppError> {
    helpers::validate_string(input.email.clone(), "email", 255)?;
    if !input.email.contains('@') || input.email.len() < 4 {
        return Err(AppError::InvalidInput("잘못된 이메일 형식".to_string()));
    }

    helpers::validate_string(input.password.clone(), "password", 255)?;
    if input.password.len() < 4 {
        return Err(AppError::InvalidInput("비밀번호는 4자 이상이어야 합니다".to_string()));
    }

    helpers::validate_string(input.username.clone(), "username", 20)?;

    if input.phone_number.len() != 13
        || !input
            .phone_number
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'-')
    {
        return Err(AppError::InvalidInput(format!(
            "{} Wrong Phone Number",
            input.phone_number
        )));
    }

    Ok(())
}
