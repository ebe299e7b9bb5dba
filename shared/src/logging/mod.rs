//! 로깅 초기화
//!
//! RUST_LOG 환경변수를 존중하고, 없으면 info 레벨을 기본으로 합니다.

use tracing_subscriber::{fmt, EnvFilter};

use crate::tool::error::AppError;

/// tracing 구독자를 초기화합니다.
///
/// 테스트 등에서 여러 번 호출되어도 두 번째 호출부터는 조용히
/// 무시됩니다.
pub fn init() -> Result<(), AppError> {
    let filter = EnvFilter::from_default_env().add_directive(
        "info"
            .parse()
            .map_err(|e| AppError::Configuration(format!("로깅 설정 파싱 실패: {e}")))?,
    );

    let _ = fmt().with_env_filter(filter).try_init();
    Ok(())
}
