//! 核心层：存储抽象与通用能力
//!
//! 包含角色/用户存储接口、内存实现和模拟延迟

pub mod latency;
pub mod store;
