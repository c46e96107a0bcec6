//! 会话上下文
//!
//! 角色切换器的客户端选择：记录“当前角色”并回答权限判定。
//! 选择不会持久化，也不会修改任何用户的角色分配。

use tracing::debug;

use crate::domain::Role;
use crate::errors::{HrmsError, Result};

use super::role_service::RoleService;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Option<Role>,
}

impl SessionContext {
    /// 未选择角色的会话
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(role: Role) -> Self {
        Self {
            current: Some(role),
        }
    }

    /// 切换当前角色；角色不存在时保持原选择不变
    pub async fn set_role(&mut self, roles: &RoleService, role_id: &str) -> Result<&Role> {
        let role = roles.resolve(role_id).await?;
        debug!("Session switched to role {}", role.id);
        Ok(self.current.insert(role))
    }

    pub fn current_role(&self) -> Option<&Role> {
        self.current.as_ref()
    }

    /// 未选择角色时一律拒绝
    pub fn can(&self, key: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|role| role.has_permission(key))
    }

    /// 缺少权限时返回 `PermissionDenied`
    pub fn require(&self, key: &str) -> Result<()> {
        if self.can(key) {
            Ok(())
        } else {
            Err(HrmsError::PermissionDenied(key.to_string()))
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
