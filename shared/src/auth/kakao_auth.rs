//! 카카오 OAuth 연동
//!
//! 인가 코드 → 토큰 교환 → 프로필 조회 HTTP 흐름을 담당합니다.
//! 모든 단계는 동기적으로 결과를 반환하며, 실패는 호출자에게 그대로
//! 전파됩니다. 인가 코드는 1회용이므로 교환 실패 시 재시도하지 않습니다.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::redirect::Policy;
use tracing::{error, info};

use crate::auth::types::{KakaoProfile, KakaoTokenResponse};
use crate::config::AuthConfig;
use crate::tool::error::AppError;

const KAKAO_AUTH_URL: &str = "https://kauth.kakao.com/oauth/authorize";
const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";
const KAKAO_LOGOUT_URL: &str = "https://kapi.kakao.com/v1/user/logout";

/// 외부 호출 타임아웃. 제3자 API를 무한정 기다리지 않는다.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REDIRECTS: usize = 5;

/// 카카오 OAuth HTTP 클라이언트
pub struct KakaoAuthClient {
    http: reqwest::Client,
    rest_key: String,
    redirect_uri: String,
}

impl KakaoAuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP 클라이언트 생성 실패: {e}")))?;

        Ok(Self {
            http,
            rest_key: config.kakao_rest_key.clone(),
            redirect_uri: config.kakao_redirect_uri.clone(),
        })
    }

    /// 카카오 로그인 페이지로 보낼 인가 요청 URL을 만듭니다.
    pub fn build_authorize_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code",
            KAKAO_AUTH_URL, self.rest_key, self.redirect_uri
        )
    }

    /// 인가 코드를 카카오 토큰으로 교환합니다.
    ///
    /// # 인자
    /// - `code`: redirect로 전달받은 인가 코드
    ///
    /// # 반환
    /// - 성공 시 카카오 access/refresh 토큰
    /// - 네트워크 오류, 2xx 아님, 본문 파싱 실패는 모두 `ExternalApi`
    pub async fn exchange_code(&self, code: &str) -> Result<KakaoTokenResponse, AppError> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("client_id", self.rest_key.as_str());
        params.insert("redirect_uri", self.redirect_uri.as_str());
        params.insert("code", code);

        let response = self.http.post(KAKAO_TOKEN_URL).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("카카오 토큰 교환 실패: status={}, body={}", status, body);
            return Err(AppError::ExternalApi(format!(
                "카카오 토큰 엔드포인트 응답 {status}"
            )));
        }

        let tokens = response.json::<KakaoTokenResponse>().await.map_err(|e| {
            error!("카카오 토큰 응답 파싱 실패: {}", e);
            AppError::ExternalApi("카카오 토큰 응답 형식 오류".to_string())
        })?;

        info!("카카오 토큰 교환 성공");
        Ok(tokens)
    }

    /// 카카오 access 토큰으로 사용자 프로필을 조회합니다.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<KakaoProfile, AppError> {
        let response = self
            .http
            .post(KAKAO_PROFILE_URL)
            .header("Authorization", format!("bearer {access_token}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("카카오 프로필 조회 실패: status={}, body={}", status, body);
            return Err(AppError::ExternalApi(format!(
                "카카오 프로필 엔드포인트 응답 {status}"
            )));
        }

        response.json::<KakaoProfile>().await.map_err(|e| {
            error!("카카오 프로필 응답 파싱 실패: {}", e);
            AppError::ExternalApi("카카오 프로필 응답 형식 오류".to_string())
        })
    }

    /// 카카오 측 세션을 로그아웃합니다.
    ///
    /// 제공자 세션만 끊습니다. 우리 쪽 refresh 토큰 해제는 별도의
    /// 로그아웃 경로가 담당합니다.
    pub async fn logout(&self, access_token: &str) -> Result<(), AppError> {
        let response = self
            .http
            .post(KAKAO_LOGOUT_URL)
            .header("Authorization", format!("bearer {access_token}"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("카카오 로그아웃 실패: status={}", status);
            return Err(AppError::ExternalApi(format!(
                "카카오 로그아웃 엔드포인트 응답 {status}"
            )));
        }

        Ok(())
    }
}
