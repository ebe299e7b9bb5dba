//! 인증 설정
//!
//! 토큰 서명 비밀키/만료 시간, 카카오 OAuth 키, NCP SMS 키를
//! .env에서 읽어 들이는 읽기 전용 설정입니다. 런타임에 변경되지 않습니다.

use std::env;
use tracing::info;

use crate::config::db::load_env_file;
use crate::tool::error::AppError;

/// 인증번호 캐시 TTL 기본값 (초)
const DEFAULT_AUTH_CODE_TTL_SECS: u64 = 300;

/// 토큰/외부 서비스 설정
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access 토큰 서명 비밀키
    pub access_token_secret: String,
    /// Access 토큰 수명 (초)
    pub access_token_ttl_secs: i64,
    /// Refresh 토큰 서명 비밀키 (access와 반드시 다른 키를 사용)
    pub refresh_token_secret: String,
    /// Refresh 토큰 수명 (초)
    pub refresh_token_ttl_secs: i64,

    /// 카카오 REST API 키
    pub kakao_rest_key: String,
    /// 카카오 인가 코드 redirect URI
    pub kakao_redirect_uri: String,

    /// NCP IAM access key
    pub ncp_access_key: String,
    /// NCP secret key (서명 계산용)
    pub ncp_secret_key: String,
    /// NCP SMS 요청 URI 경로 (서명 대상 문자열에 포함)
    pub ncp_sms_uri: String,
    /// NCP SMS 전체 요청 URL
    pub ncp_sms_url: String,
    /// 발신 번호
    pub ncp_sms_from: String,

    /// SMS 인증번호 TTL (초)
    pub auth_code_ttl_secs: u64,
}

impl AuthConfig {
    /// .env에서 인증 설정을 로드합니다.
    ///
    /// 토큰 비밀키는 필수이며, 약한 키는 기동 자체를 거부합니다.
    ///
    /// # Returns
    /// * `Result<Self, AppError>` - 설정 또는 Configuration 에러
    pub fn from_env() -> Result<Self, AppError> {
        load_env_file();

        let access_token_secret = require_secret("JWT_ACCESS_TOKEN_SECRET")?;
        let refresh_token_secret = require_secret("JWT_REFRESH_TOKEN_SECRET")?;

        if access_token_secret == refresh_token_secret {
            return Err(AppError::Configuration(
                "JWT_ACCESS_TOKEN_SECRET과 JWT_REFRESH_TOKEN_SECRET은 서로 달라야 합니다".into(),
            ));
        }

        let access_token_ttl_secs = parse_secs("JWT_ACCESS_TOKEN_EXPIRATION_TIME", 900)?;
        let refresh_token_ttl_secs = parse_secs("JWT_REFRESH_TOKEN_EXPIRATION_TIME", 1_209_600)?;

        let config = Self {
            access_token_secret,
            access_token_ttl_secs,
            refresh_token_secret,
            refresh_token_ttl_secs,
            kakao_rest_key: require_var("KAKAO_REST_KEY")?,
            kakao_redirect_uri: require_var("KAKAO_REDIRECT_URI")?,
            ncp_access_key: require_var("NCP_USER_ACCESS_KEY")?,
            ncp_secret_key: require_var("NCP_USER_SECRET_KEY")?,
            ncp_sms_uri: require_var("NCP_SMS_URI")?,
            ncp_sms_url: require_var("NCP_SMS_URL")?,
            ncp_sms_from: require_var("NCP_SMS_HOST_NUMBER")?,
            auth_code_ttl_secs: env::var("AUTH_CODE_EXPIRATION_TIME")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_AUTH_CODE_TTL_SECS),
        };

        info!(
            "인증 설정 로드 완료: access_ttl={}s, refresh_ttl={}s, code_ttl={}s",
            config.access_token_ttl_secs, config.refresh_token_ttl_secs, config.auth_code_ttl_secs
        );

        Ok(config)
    }
}

fn require_var(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| {
        AppError::Configuration(format!(
            "환경변수 '{name}'가 설정되지 않았습니다. .env 파일을 확인하세요."
        ))
    })
}

/// 토큰 서명 비밀키를 읽고 강도를 검증합니다.
///
/// 32자 미만이거나 기본값 흔적이 보이는 키는 거부합니다.
fn require_secret(name: &str) -> Result<String, AppError> {
    let secret = require_var(name)?;

    if secret.len() < 32 {
        return Err(AppError::Configuration(format!(
            "{name}은(는) 최소 32자 이상이어야 합니다. 현재 길이: {}. 예: openssl rand -hex 32",
            secret.len()
        )));
    }

    let lower = secret.to_lowercase();
    if lower.contains("default")
        || lower.contains("secret")
        || lower.contains("change")
        || lower.contains("example")
    {
        return Err(AppError::Configuration(format!(
            "{name}에 기본값/약한 값이 포함된 것으로 보입니다. 예: openssl rand -hex 32"
        )));
    }

    Ok(secret)
}

fn parse_secs(name: &str, default: i64) -> Result<i64, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<i64>()
            .map_err(|_| AppError::Configuration(format!("{name}은(는) 초 단위 숫자여야 합니다"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        env::set_var("TEST_SHORT_SECRET", "too-short");
        let err = require_secret("TEST_SHORT_SECRET").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        env::remove_var("TEST_SHORT_SECRET");
    }

    #[test]
    fn weak_secret_is_rejected() {
        env::set_var(
            "TEST_WEAK_SECRET",
            "change-me-please-change-me-please-change-me",
        );
        let err = require_secret("TEST_WEAK_SECRET").unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        env::remove_var("TEST_WEAK_SECRET");
    }
}
