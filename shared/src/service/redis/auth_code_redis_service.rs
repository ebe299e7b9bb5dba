//! Redis 인증번호 저장소
//!
//! 전화번호별 인증번호를 `auth_code:{번호}` 키에 TTL과 함께 저장합니다.
//! 일시적인 연결 오류에 대비해 백오프+지터로 재시도합니다.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use redis::AsyncCommands;
use tokio::time::sleep;

use crate::config::RedisConfig;
use crate::tool::error::AppError;
use crate::traits::CodeStore;

const RETRY_COUNT: u8 = 3;
const RETRY_DELAY_MS: u64 = 200;
const RETRY_JITTER_MS: u64 = 50;

// 키 스킴: auth_code:{phone_number}
fn code_key(phone_number: &str) -> String {
    format!("auth_code:{phone_number}")
}

/// Redis 기반 CodeStore 구현
#[derive(Clone)]
pub struct RedisCodeStore {
    conn: RedisConfig,
}

impl RedisCodeStore {
    pub fn new(conn: RedisConfig) -> Self {
        Self { conn }
    }

    /// SET key value EX ttl 한 번으로 값과 만료를 원자적으로 기록합니다.
    async fn set_code(&self, key: &str, code: &str, ttl_secs: u64) -> Result<()> {
        with_retry(|| {
            let key = key.to_string();
            let code = code.to_string();
            async move {
                let mut conn = self.conn.get_connection();
                redis::cmd("SET")
                    .arg(&key)
                    .arg(&code)
                    .arg("EX")
                    .arg(ttl_secs)
                    .query_async::<_, ()>(&mut conn)
                    .await
                    .context("RedisCodeStore: SET EX 실패")
            }
        })
        .await
    }

    async fn get_code(&self, key: &str) -> Result<Option<String>> {
        with_retry(|| {
            let key = key.to_string();
            async move {
                let mut conn = self.conn.get_connection();
                conn.get::<_, Option<String>>(&key)
                    .await
                    .context("RedisCodeStore: GET 실패")
            }
        })
        .await
    }

    async fn delete_code(&self, key: &str) -> Result<()> {
        with_retry(|| {
            let key = key.to_string();
            async move {
                let mut conn = self.conn.get_connection();
                let _deleted: i64 = conn
                    .del(&key)
                    .await
                    .context("RedisCodeStore: DEL 실패")?;
                Ok(())
            }
        })
        .await
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(&self, phone_number: &str, code: &str, ttl_secs: u64) -> Result<(), AppError> {
        self.set_code(&code_key(phone_number), code, ttl_secs)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn get(&self, phone_number: &str) -> Result<Option<String>, AppError> {
        self.get_code(&code_key(phone_number))
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    async fn delete(&self, phone_number: &str) -> Result<(), AppError> {
        self.delete_code(&code_key(phone_number))
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }
}

/// 재시도 헬퍼
///
/// 마지막 시도의 에러를 그대로 반환합니다.
async fn with_retry<T, F, Fut>(mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = RETRY_COUNT;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempts -= 1;
                if attempts == 0 {
                    return Err(e);
                }
                let jitter = rand::thread_rng().gen_range(0..RETRY_JITTER_MS);
                sleep(Duration::from_millis(RETRY_DELAY_MS + jitter)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retry_returns_first_success() {
        let calls = AtomicU32::new(0);

        let result = with_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(anyhow::anyhow!("connection reset"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.expect("second attempt succeeds"), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_gives_up_after_limit() {
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(anyhow::anyhow!("down")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), RETRY_COUNT as u32);
    }

    #[test]
    fn key_scheme_is_per_phone_number() {
        assert_eq!(code_key("010-1111-2222"), "auth_code:010-1111-2222");
    }
}
