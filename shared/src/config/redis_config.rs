//! Redis Configuration
//!
//! 인증번호 캐시가 사용하는 Redis 연결 설정입니다.

use redis::{aio::ConnectionManager, Client, RedisError};
use std::env;
use tracing::warn;

use crate::config::db::load_env_file;

pub type RedisConnection = ConnectionManager;

#[derive(Clone)]
pub struct RedisConfig {
    pub conn: RedisConnection,
    pub host: String,
    pub port: u16,
}

impl RedisConfig {
    pub async fn new() -> Result<Self, RedisError> {
        load_env_file();

        let host = env::var("redis_host").unwrap_or_else(|_| {
            warn!("redis_host 환경변수가 없어서 localhost를 사용합니다.");
            "localhost".to_string()
        });

        let port_str = env::var("redis_port").unwrap_or_else(|_| {
            warn!("redis_port 환경변수가 없어서 6379를 사용합니다.");
            "6379".to_string()
        });

        let port = port_str.parse::<u16>().map_err(|_| {
            RedisError::from((redis::ErrorKind::InvalidClientConfig, "redis_port는 숫자여야 함"))
        })?;

        let client = Client::open(format!("redis://{}:{}", host, port))?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            conn: manager,
            host,
            port,
        })
    }

    pub fn get_connection(&self) -> RedisConnection {
        self.conn.clone()
    }
}
