//! 사용자 계정 모델

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// users 테이블 1행
///
/// `refresh_token_hash`는 현재 유효한 refresh 토큰의 bcrypt 해시로,
/// 계정당 동시에 하나만 존재합니다. 새 값을 쓰면 이전 값은 대체됩니다.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub kakao_id: Option<i64>,
}

impl User {
    /// 해시 필드를 제외한 응답용 요약으로 변환합니다.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

/// 응답에 노출 가능한 사용자 정보 (해시 필드 제외)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    pub username: String,
}

/// 저장소에 새 계정을 만들 때 넘기는 필드 (비밀번호는 이미 해시된 상태)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub password_hash: String,
    pub kakao_id: Option<i64>,
}

/// 회원가입 요청 입력 (비밀번호 평문은 서비스 계층에서만 다룸)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
}

/// 부분 수정 필드
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

/// 로그인/토큰 갱신 성공 결과
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}
