//! Domain Layer
//!
//! Core business entity definitions

pub mod permission;
pub mod role;
pub mod seed;
pub mod user;

pub use permission::{has_permission, Permission, WILDCARD};
pub use role::{CreateRoleInput, Role, UpdateRoleInput};
pub use seed::SeedData;
pub use user::{CreateUserInput, UpdateUserInput, User, UserStatus};

/// 当前时间（Unix 毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 新的修改时间，严格大于 `previous`
pub fn next_stamp(previous: i64) -> i64 {
    now_millis().max(previous.saturating_add(1))
}
