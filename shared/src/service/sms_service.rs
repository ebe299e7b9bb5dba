//! NCP SMS 발송 서비스
//!
//! NCP SENS 게이트웨이의 서명 방식(x-ncp-apigw-signature-v2)에 맞춰
//! 요청마다 HMAC-SHA256 서명을 새로 계산해서 발송합니다. 타임스탬프가
//! 서명 대상 문자열에 포함되므로 서명은 호출 시점마다 달라집니다.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tracing::{error, info};

use crate::config::AuthConfig;
use crate::tool::error::AppError;
use crate::traits::SmsGateway;

type HmacSha256 = Hmac<Sha256>;

/// 외부 호출 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// NCP SMS 발송 요청 본문
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SmsRequest<'a> {
    r#type: &'a str,
    content_type: &'a str,
    country_code: &'a str,
    from: &'a str,
    content: &'a str,
    messages: Vec<SmsRecipient<'a>>,
}

#[derive(Debug, Serialize)]
struct SmsRecipient<'a> {
    to: &'a str,
}

/// NCP SENS SMS 게이트웨이 클라이언트
pub struct NcpSmsService {
    http: reqwest::Client,
    access_key: String,
    secret_key: String,
    sms_uri: String,
    sms_url: String,
    from_number: String,
}

impl NcpSmsService {
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP 클라이언트 생성 실패: {e}")))?;

        Ok(Self {
            http,
            access_key: config.ncp_access_key.clone(),
            secret_key: config.ncp_secret_key.clone(),
            sms_uri: config.ncp_sms_uri.clone(),
            sms_url: config.ncp_sms_url.clone(),
            from_number: config.ncp_sms_from.clone(),
        })
    }

    /// NCP API Gateway 서명을 생성합니다.
    ///
    /// 서명 대상은 `"{method} {uri}\n{timestamp}\n{accessKey}"`이고,
    /// HMAC-SHA256 결과를 base64로 인코딩합니다.
    fn make_signature(&self, timestamp: &str) -> Result<String, AppError> {
        let message = format!("POST {}\n{}\n{}", self.sms_uri, timestamp, self.access_key);

        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| AppError::InternalError(format!("HMAC 키 초기화 실패: {e}")))?;
        mac.update(message.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl SmsGateway for NcpSmsService {
    /// SMS 1건을 발송합니다.
    ///
    /// 2xx가 아니거나 네트워크 오류면 `ExternalApi`이며, 원인은 로그에만
    /// 남깁니다.
    async fn send(&self, phone_number: &str, content: &str) -> Result<(), AppError> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let signature = self.make_signature(&timestamp)?;

        let body = SmsRequest {
            r#type: "SMS",
            content_type: "COMM",
            country_code: "82",
            from: &self.from_number,
            content,
            messages: vec![SmsRecipient { to: phone_number }],
        };

        let response = self
            .http
            .post(&self.sms_url)
            .header("x-ncp-apigw-timestamp", timestamp.as_str())
            .header("x-ncp-iam-access-key", self.access_key.as_str())
            .header("x-ncp-apigw-signature-v2", signature.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("SMS 발송 실패: status={}, body={}", status, body);
            return Err(AppError::ExternalApi(format!("SMS 게이트웨이 응답 {status}")));
        }

        info!("SMS 발송 완료: to={}", phone_number);
        Ok(())
    }
}
