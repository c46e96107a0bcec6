//! 标准化错误处理
//!
//! 定义项目专用的错误类型

use thiserror::Error;

use crate::domain::UserStatus;

/// 项目主要错误类型
#[derive(Error, Debug)]
pub enum HrmsError {
    /// 邮箱已被其他用户占用
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// 用户不存在
    #[error("User not found: {0}")]
    NotFound(String),

    /// 角色不存在
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// 角色 ID 已存在
    #[error("Role already exists: {0}")]
    DuplicateRole(String),

    /// 默认角色不可删除
    #[error("Default role cannot be deleted: {0}")]
    DefaultRoleProtected(String),

    /// 权限键格式错误
    #[error("Invalid permission key: {0}")]
    InvalidPermission(String),

    /// 输入验证错误
    #[error("Validation error: {0}")]
    Validation(String),

    /// 状态流转不被允许（仅严格模式）
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: UserStatus, to: UserStatus },

    /// 当前角色缺少权限
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 存储相关错误
    #[error("Storage error: {0}")]
    Storage(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for HrmsError {
    fn from(err: anyhow::Error) -> Self {
        HrmsError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for HrmsError {
    fn from(err: std::io::Error) -> Self {
        HrmsError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for HrmsError {
    fn from(err: rusqlite::Error) -> Self {
        HrmsError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for HrmsError {
    fn from(err: serde_json::Error) -> Self {
        HrmsError::Storage(err.to_string())
    }
}

impl From<serde_yaml::Error> for HrmsError {
    fn from(err: serde_yaml::Error) -> Self {
        HrmsError::Config(err.to_string())
    }
}

/// 项目结果类型别名
pub type Result<T> = std::result::Result<T, HrmsError>;
