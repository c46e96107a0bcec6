//! Permission Definitions
//!
//! 权限键采用 `<resource>.<action>` 形式（如 `leave.approve`），
//! 通配符 `*` 表示拥有全部权限。判定只做精确匹配，不支持 `leave.*` 这类前缀。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;

/// 通配符权限
pub const WILDCARD: &str = "*";

/// 已知权限键（默认角色所用）
pub const ALL_PERMISSIONS: &[&str] = &[
    // === 员工目录 ===
    "employees.view",
    "employees.create",
    "employees.edit",
    "employees.delete",
    // === 角色 ===
    "roles.manage",
    "roles.assign",
    // === 考勤与假期 ===
    "attendance.view",
    "attendance.manage",
    "leave.view",
    "leave.apply",
    "leave.approve",
    // === 薪酬与报销 ===
    "payroll.view",
    "payroll.process",
    "expenses.submit",
    "expenses.approve",
    // === 其他 ===
    "performance.review",
    "documents.view",
    "reports.view",
    "profile.view",
    "profile.edit",
    "team.view",
    "settings.manage",
];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &[WILDCARD];

pub const DEFAULT_HR_MANAGER_PERMISSIONS: &[&str] = &[
    "employees.view",
    "employees.create",
    "employees.edit",
    "employees.delete",
    "roles.assign",
    "attendance.view",
    "attendance.manage",
    "leave.view",
    "leave.approve",
    "performance.review",
    "documents.view",
    "reports.view",
    "profile.view",
    "profile.edit",
];

pub const DEFAULT_FINANCE_MANAGER_PERMISSIONS: &[&str] = &[
    "employees.view",
    "payroll.view",
    "payroll.process",
    "expenses.submit",
    "expenses.approve",
    "reports.view",
    "profile.view",
    "profile.edit",
];

pub const DEFAULT_TEAM_LEAD_PERMISSIONS: &[&str] = &[
    "employees.view",
    "team.view",
    "attendance.view",
    "leave.view",
    "leave.apply",
    "leave.approve",
    "performance.review",
    "expenses.submit",
    "profile.view",
    "profile.edit",
];

pub const DEFAULT_EMPLOYEE_PERMISSIONS: &[&str] = &[
    "attendance.view",
    "leave.view",
    "leave.apply",
    "expenses.submit",
    "documents.view",
    "profile.view",
    "profile.edit",
];

/// 单条权限
///
/// 序列化为普通字符串：`"*"` 或具体的权限键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Permission {
    /// 全部权限
    All,
    /// 具体权限键
    Specific(String),
}

impl Permission {
    pub fn key(&self) -> &str {
        match self {
            Permission::All => WILDCARD,
            Permission::Specific(key) => key,
        }
    }

    /// 该条权限是否覆盖给定的权限键
    pub fn grants(&self, key: &str) -> bool {
        match self {
            Permission::All => true,
            Permission::Specific(own) => own == key,
        }
    }

    /// 检查 `<resource>.<action>` 格式
    pub fn is_well_formed(&self) -> bool {
        match self {
            Permission::All => true,
            Permission::Specific(key) => match key.split_once('.') {
                Some((resource, action)) => {
                    !resource.is_empty()
                        && !action.is_empty()
                        && !key.chars().any(|c| c.is_whitespace() || c == '*')
                }
                None => false,
            },
        }
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        if value == WILDCARD {
            Permission::All
        } else {
            Permission::Specific(value)
        }
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Permission::from(value.to_string())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        match value {
            Permission::All => WILDCARD.to_string(),
            Permission::Specific(key) => key,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 角色是否拥有某权限
pub fn has_permission(role: &Role, key: &str) -> bool {
    role.permissions.iter().any(|p| p.grants(key))
}

/// 将字符串常量表转换为权限列表
pub fn permissions_from(keys: &[&str]) -> Vec<Permission> {
    keys.iter().map(|k| Permission::from(*k)).collect()
}

/// Get permissions for a default role id
pub fn default_permissions(role_id: &str) -> Vec<Permission> {
    match role_id {
        "admin" => permissions_from(DEFAULT_ADMIN_PERMISSIONS),
        "hr_manager" => permissions_from(DEFAULT_HR_MANAGER_PERMISSIONS),
        "finance_manager" => permissions_from(DEFAULT_FINANCE_MANAGER_PERMISSIONS),
        "team_lead" => permissions_from(DEFAULT_TEAM_LEAD_PERMISSIONS),
        "employee" => permissions_from(DEFAULT_EMPLOYEE_PERMISSIONS),
        _ => vec![],
    }
}
