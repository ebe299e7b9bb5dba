pub mod auth_code_redis_service;

pub use auth_code_redis_service::RedisCodeStore;
