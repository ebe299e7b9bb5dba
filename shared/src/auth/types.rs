//! 인증 관련 공통 타입 정의

use serde::{Deserialize, Serialize};

/// JWT 클레임
///
/// 발급 후 불변이며, 만료 시각은 서명된 페이로드 안에 들어갑니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 계정 식별자 (이메일)
    pub sub: String,
    /// 발급 시간 (Unix timestamp, 초)
    pub iat: i64,
    /// 만료 시간 (Unix timestamp, 초)
    pub exp: i64,
}

/// 토큰 종류
///
/// access/refresh는 서로 다른 비밀키로 서명되므로 한쪽 키가 유출되어도
/// 다른 쪽 토큰을 위조할 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// 로그인 시 발급되는 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// 로그인 자격 증명
///
/// 호출자가 변형을 선택하고, `AuthService::login` 하나로 진입합니다.
#[derive(Debug, Clone)]
pub enum Credential {
    /// 이메일/비밀번호 로그인
    Password { email: String, password: String },
    /// 카카오 access 토큰 로그인
    Kakao { access_token: String },
}

/// 카카오 토큰 엔드포인트 응답
#[derive(Debug, Clone, Deserialize)]
pub struct KakaoTokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

/// 카카오 사용자 프로필 응답
///
/// 스키마는 제공자 소유이며, 아래 세 필드 외에는 사용하지 않습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct KakaoProfile {
    pub id: i64,
    pub kakao_account: KakaoAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoAccount {
    pub email: Option<String>,
    pub profile: Option<KakaoProfileDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoProfileDetail {
    pub nickname: Option<String>,
    pub profile_image_url: Option<String>,
}

impl KakaoProfile {
    /// 닉네임이 없으면 기본값을 사용합니다.
    pub fn nickname(&self) -> String {
        self.kakao_account
            .profile
            .as_ref()
            .and_then(|p| p.nickname.clone())
            .unwrap_or_else(|| "User".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kakao_profile_parses_nested_shape() {
        let raw = r#"{
            "id": 12345,
            "kakao_account": {
                "email": "user@example.com",
                "profile": { "nickname": "철수", "profile_image_url": null }
            }
        }"#;

        let profile: KakaoProfile = serde_json::from_str(raw).expect("profile should parse");
        assert_eq!(profile.id, 12345);
        assert_eq!(profile.kakao_account.email.as_deref(), Some("user@example.com"));
        assert_eq!(profile.nickname(), "철수");
    }

    #[test]
    fn kakao_profile_without_nickname_falls_back() {
        let raw = r#"{ "id": 7, "kakao_account": { "email": null } }"#;
        let profile: KakaoProfile = serde_json::from_str(raw).expect("profile should parse");
        assert_eq!(profile.nickname(), "User");
    }
}
