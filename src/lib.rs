//! HRMS 核心
//!
//! 提供人力资源管理系统的核心能力：
//! - 角色与权限模型（通配符 `*`、默认角色保护）
//! - 员工目录（邮箱唯一、工号递增、状态管理）
//! - 可注入的模拟延迟，替代未来的远程 API
//! - HTTP/JSON API（axum）
//!
//! # 架构分层
//!
//! - `domain`: 领域模型（角色、用户、权限、种子数据）
//! - `core`: 存储抽象与内存实现
//! - `application`: 业务规则（用户服务、角色服务、会话）
//! - `infrastructure`: 日志、SQLite 存储、Web 服务

// 领域层
pub mod domain;

// 核心层
pub mod core;

// 应用层
pub mod application;

// 基础设施层
pub mod infrastructure;

pub mod config;
pub mod errors;

// 重新导出常用类型
pub use application::{RoleService, ServiceOptions, Services, SessionContext, UserService};
pub use crate::core::latency::Latency;
pub use crate::core::store::{MemoryStore, RoleStore, Store, UserFilter, UserStore};
pub use domain::{
    has_permission, CreateRoleInput, CreateUserInput, Permission, Role, SeedData, UpdateRoleInput,
    UpdateUserInput, User, UserStatus,
};
pub use errors::{HrmsError, Result};
pub use infrastructure::store::SqliteStore;

/// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
