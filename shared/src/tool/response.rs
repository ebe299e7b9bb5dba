//! 공통 응답 포맷
//!
//! 요청 파이프라인이 핸들러 결과를 감싸는 성공/실패 봉투입니다.

use serde::{Deserialize, Serialize};

use crate::tool::error::AppError;

/// 성공/실패 공통 응답
///
/// `ok`가 true면 `data`가, false면 `error_code`/`message`가 채워집니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error_code: None,
            message: None,
        }
    }

    pub fn fail(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error_code: Some(error_code.into()),
            message: Some(message.into()),
        }
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) | AppError::MissingField(_) => "INVALID_PARAMETER",
            AppError::ExternalApi(_) | AppError::Timeout(_) => "EXTERNAL_SERVICE_ERROR",
            _ => "SYSTEM_ERROR",
        };

        // 인증 실패 메시지는 세부 원인을 감춘다
        let message = match &err {
            AppError::Unauthorized(_) => "Invalid credentials".to_string(),
            AppError::ExternalApi(_) => "일시적인 오류가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string(),
            other => other.to_string(),
        };

        Self::fail(code, message)
    }
}
