//! Role Model

use serde::{Deserialize, Serialize};

use super::permission::{self, Permission};
use super::{next_stamp, now_millis};

/// Role entity (RBAC 角色)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// e.g. ["*"], ["leave.view", "leave.approve"]
    pub permissions: Vec<Permission>,
    /// 内置角色，不可删除，`id` 不可变更
    #[serde(default)]
    pub is_default: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Role {
    /// 创建自定义角色（非默认）
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            permissions,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_permission(&self, key: &str) -> bool {
        permission::has_permission(self, key)
    }

    /// 是否为超级角色（持有通配符）
    pub fn is_wildcard(&self) -> bool {
        self.permissions.contains(&Permission::All)
    }

    /// 合并更新字段；`id` 与 `is_default` 不在补丁范围内
    pub fn apply(&mut self, patch: UpdateRoleInput) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(permissions) = patch.permissions {
            self.permissions = permissions;
        }
        self.updated_at = next_stamp(self.updated_at);
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Update role payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<Permission>>,
}
