//! JWT 토큰 발급/검증 서비스
//!
//! - access/refresh 토큰 클래스별 개별 비밀키
//! - 만료 시간은 서명된 페이로드에 포함
//! - 검증은 fail-closed: 서명 불량/포맷 불량/만료를 구분하지 않음

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::types::{Claims, TokenKind, TokenPair};
use crate::config::AuthConfig;
use crate::tool::error::AppError;

/// JWT 토큰 발급 및 검증을 담당하는 서비스
///
/// Access 토큰에는 폐기 목록이 없습니다. 짧은 수명이 유일한 방어선이며,
/// 서버 측 폐기는 refresh 토큰(계정에 해시로 바인딩)에만 적용됩니다.
#[derive(Debug, Clone)]
pub struct TokenService {
    access_secret: String,
    access_ttl_secs: i64,
    refresh_secret: String,
    refresh_ttl_secs: i64,
}

impl TokenService {
    /// 새 TokenService 인스턴스를 생성합니다.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_secret: config.access_token_secret.clone(),
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_secret: config.refresh_token_secret.clone(),
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    /// Access 토큰을 생성합니다.
    ///
    /// # 인자
    /// - `email`: 계정 식별자 (sub 클레임에 들어감)
    ///
    /// # 반환
    /// - 성공 시 서명된 JWT 문자열
    pub fn issue_access_token(&self, email: &str) -> Result<String, AppError> {
        self.issue(email, TokenKind::Access)
    }

    /// Refresh 토큰을 생성합니다.
    pub fn issue_refresh_token(&self, email: &str) -> Result<String, AppError> {
        self.issue(email, TokenKind::Refresh)
    }

    /// 로그인 시 사용하는 access + refresh 토큰 쌍을 생성합니다.
    pub fn issue_pair(&self, email: &str) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.issue_access_token(email)?,
            refresh_token: self.issue_refresh_token(email)?,
        })
    }

    /// 토큰을 검증하고 클레임을 반환합니다.
    ///
    /// 서명 불량, 페이로드 불량, 만료 모두 동일한 `Unauthorized`로
    /// 수렴합니다. 어떤 이유로 실패했는지는 호출자에게 노출하지 않습니다.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_for(kind).as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized("유효하지 않거나 만료된 토큰".to_string()))
    }

    fn issue(&self, email: &str, kind: TokenKind) -> Result<String, AppError> {
        let now = Utc::now();
        let ttl_secs = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };

        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret_for(kind).as_bytes()),
        )
        .map_err(|e| AppError::InternalError(format!("토큰 서명 실패: {e}")))
    }

    fn secret_for(&self, kind: TokenKind) -> &str {
        match kind {
            TokenKind::Access => &self.access_secret,
            TokenKind::Refresh => &self.refresh_secret,
        }
    }
}
