pub mod auth_config;
pub mod db;
pub mod redis_config;

pub use auth_config::AuthConfig;
pub use db::{DbConfig, DbConnection};
pub use redis_config::{RedisConfig, RedisConnection};
