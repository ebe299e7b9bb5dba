pub mod memory;
pub mod redis;
pub mod sms_service;
pub mod user_db_service;
pub mod verify_code_service;

// Re-export all from each module namespace
pub use memory::{MemoryCodeStore, MemoryUserStore};
pub use redis::RedisCodeStore;
pub use sms_service::NcpSmsService;
pub use user_db_service::MySqlUserStore;
pub use verify_code_service::PhoneVerifyService;
