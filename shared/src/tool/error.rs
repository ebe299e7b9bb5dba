//! 인증 서버 Error Management System
//!
//! 인증/세션 비즈니스 로직에서 발생하는 모든 에러를 체계적으로 관리합니다.
//! 비즈니스 로직 에러를 gRPC Status로 변환하고, 로깅과 모니터링을 지원합니다.

use thiserror::Error;
use tonic::Status;
use tracing::{error, info, warn};

/// 공통 애플리케이션 에러 정의
///
/// 자격 증명/토큰 실패는 경계에서 더 구체적인 메시지로 번역하지 않습니다.
/// (존재하지 않는 계정과 잘못된 비밀번호를 구분하면 계정 열거가 가능해짐)
#[derive(Error, Debug, Clone)]
pub enum AppError {
    // 인증 관련 에러
    #[error("인증 실패: {0}")]
    Unauthorized(String),

    #[error("중복된 식별자: {0}")]
    Conflict(String),

    #[error("찾을 수 없습니다: {0}")]
    NotFound(String),

    // 입력값 검증 에러
    #[error("입력값 오류: {0}")]
    InvalidInput(String),

    #[error("필수 필드 누락: {0}")]
    MissingField(String),

    // 외부 서비스 에러
    #[error("외부 API 호출 실패: {0}")]
    ExternalApi(String),

    // 데이터베이스 관련 에러
    #[error("데이터베이스 연결 실패: {0}")]
    DatabaseConnection(String),

    #[error("데이터베이스 쿼리 실패: {0}")]
    DatabaseQuery(String),

    #[error("Redis 에러: {0}")]
    RedisError(String),

    // 시스템 에러
    #[error("내부 서버 에러: {0}")]
    InternalError(String),

    #[error("서비스 일시적 사용 불가: {0}")]
    ServiceUnavailable(String),

    #[error("타임아웃: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// 에러의 심각도를 반환합니다.
    ///
    /// # Returns
    /// * `ErrorSeverity` - 에러의 심각도 레벨
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::DatabaseConnection(_)
            | AppError::RedisError(_)
            | AppError::ServiceUnavailable(_)
            | AppError::Configuration(_) => ErrorSeverity::Critical,

            // High: 비즈니스 로직 실패
            AppError::Unauthorized(_)
            | AppError::NotFound(_)
            | AppError::ExternalApi(_)
            | AppError::DatabaseQuery(_)
            | AppError::Timeout(_)
            | AppError::InternalError(_) => ErrorSeverity::High,

            // Medium: 사용자 입력 오류
            AppError::InvalidInput(_) | AppError::MissingField(_) => ErrorSeverity::Medium,

            // Low: 일반적인 경고
            AppError::Conflict(_) => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let severity = self.severity();
        let error_msg = self.to_string();

        match severity {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {} - {}", context, error_msg);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {} - {}", context, error_msg);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {} - {}", context, error_msg);
            }
            ErrorSeverity::Low => {
                info!("[LOW] {} - {}", context, error_msg);
            }
        }
    }

    /// 에러를 gRPC Status로 변환합니다.
    ///
    /// # Returns
    /// * `Status` - gRPC Status 객체
    pub fn to_status(&self) -> Status {
        let status: Status = self.clone().into();
        self.log("gRPC Status 변환");
        status
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 비즈니스 로직 실패
    Medium,   // 사용자 입력 오류
    Low,      // 일반적인 경고
}

impl From<AppError> for Status {
    fn from(e: AppError) -> Self {
        match e {
            // 인증 실패는 원인과 무관하게 동일한 메시지로 응답한다
            AppError::Unauthorized(_) => Status::unauthenticated("Invalid credentials"),

            AppError::Conflict(msg) => Status::already_exists(format!("Duplicate entry: {msg}")),
            AppError::NotFound(msg) => Status::not_found(msg),

            // 입력값 오류
            AppError::InvalidInput(msg) => Status::invalid_argument(msg),
            AppError::MissingField(msg) => {
                Status::invalid_argument(format!("Missing field: {msg}"))
            }

            // 외부 서비스 장애는 일반 서버 에러로만 노출 (원인은 로그에 남김)
            AppError::ExternalApi(_) => Status::unavailable("External service error"),

            // 시스템 오류
            AppError::DatabaseConnection(msg) => {
                Status::unavailable(format!("Database connection failed: {msg}"))
            }
            AppError::DatabaseQuery(msg) => {
                Status::internal(format!("Database query failed: {msg}"))
            }
            AppError::RedisError(msg) => Status::unavailable(format!("Redis error: {msg}")),
            AppError::InternalError(msg) => Status::internal(msg),
            AppError::ServiceUnavailable(msg) => Status::unavailable(msg),
            AppError::Timeout(msg) => Status::deadline_exceeded(msg),
            AppError::Configuration(msg) => Status::internal(format!("Configuration error: {msg}")),
        }
    }
}

// SqlxError conversion
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Database record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    if code == "23000" || code.starts_with("1062") {
                        // MySQL duplicate entry error
                        AppError::Conflict(db_err.to_string())
                    } else {
                        AppError::DatabaseQuery(db_err.to_string())
                    }
                } else {
                    AppError::DatabaseQuery(db_err.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => {
                AppError::Timeout("Database connection pool timeout".to_string())
            }
            sqlx::Error::PoolClosed => {
                AppError::DatabaseConnection("Database pool is closed".to_string())
            }
            sqlx::Error::Configuration(_) => {
                AppError::Configuration("Database configuration error".to_string())
            }
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::RedisError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("외부 요청 타임아웃: {err}"))
        } else {
            AppError::ExternalApi(err.to_string())
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("해시 처리 실패: {err}"))
    }
}

/// 에러 처리 헬퍼 함수들
pub mod helpers {
    use super::*;

    /// Option을 AppError로 변환하는 헬퍼 함수
    ///
    /// # Arguments
    /// * `option` - Option<T>
    /// * `error` - None일 때 반환할 에러
    ///
    /// # Returns
    /// * `Result<T, AppError>` - 변환된 결과
    pub fn map_option_error<T>(option: Option<T>, error: AppError) -> Result<T, AppError> {
        option.ok_or_else(|| {
            error.log("Option to Error");
            error
        })
    }

    /// 문자열 검증 헬퍼 함수
    ///
    /// # Arguments
    /// * `value` - 검증할 문자열
    /// * `field_name` - 필드 이름
    /// * `max_length` - 최대 길이
    ///
    /// # Returns
    /// * `Result<String, AppError>` - 검증 결과
    pub fn validate_string(
        value: String,
        field_name: &str,
        max_length: usize,
    ) -> Result<String, AppError> {
        if value.is_empty() {
            return Err(AppError::MissingField(field_name.to_string()));
        }

        if value.len() > max_length {
            return Err(AppError::InvalidInput(format!(
                "{field_name} too long (max: {max_length})"
            )));
        }

        Ok(value)
    }
}
