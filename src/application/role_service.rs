//! 角色服务
//!
//! 默认角色受保护：不可删除，`id` 与 `is_default` 对所有角色都不可修改。
//! 角色名称不要求唯一。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::store::Store;
use crate::domain::{CreateRoleInput, Permission, Role, UpdateRoleInput};
use crate::errors::{HrmsError, Result};

use super::ServiceOptions;

/// 角色服务
pub struct RoleService {
    store: Arc<dyn Store>,
    options: ServiceOptions,
    write_gate: Arc<Mutex<()>>,
}

impl RoleService {
    pub fn new(store: Arc<dyn Store>, options: ServiceOptions, write_gate: Arc<Mutex<()>>) -> Self {
        Self {
            store,
            options,
            write_gate,
        }
    }

    /// 所有角色
    pub async fn get_roles(&self) -> Result<Vec<Role>> {
        self.options.latency.list().await;
        let roles = self.store.list_roles().await?;
        debug!("Loaded {} roles", roles.len());
        Ok(roles)
    }

    /// 按 ID 查询，找不到返回 `None`
    pub async fn get_role_by_id(&self, id: &str) -> Result<Option<Role>> {
        self.options.latency.lookup().await;
        self.store.find_role(id).await
    }

    /// 解析角色，不经过模拟延迟（用于鉴权）
    pub async fn resolve(&self, role_id: &str) -> Result<Role> {
        self.store
            .find_role(role_id)
            .await?
            .ok_or_else(|| HrmsError::RoleNotFound(role_id.to_string()))
    }

    /// 角色是否拥有某权限
    pub async fn role_grants(&self, role_id: &str, key: &str) -> Result<bool> {
        let role = self.resolve(role_id).await?;
        Ok(role.has_permission(key))
    }

    /// 创建自定义角色
    pub async fn create_role(&self, input: CreateRoleInput) -> Result<Role> {
        validate_permissions(&input.permissions)?;
        if input.id.trim().is_empty() {
            return Err(HrmsError::Validation("role id must not be empty".to_string()));
        }

        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut roles = self.store.list_roles().await?;
        if roles.iter().any(|r| r.id == input.id) {
            warn!("Rejected role creation, id already in use: {}", input.id);
            return Err(HrmsError::DuplicateRole(input.id));
        }

        let role = Role::new(input.id, input.name, input.description, input.permissions);
        roles.push(role.clone());
        self.store.replace_roles(roles).await?;

        info!("Created role {}", role.id);
        Ok(role)
    }

    /// 更新名称、描述或权限
    pub async fn update_role(&self, id: &str, patch: UpdateRoleInput) -> Result<Role> {
        if let Some(ref permissions) = patch.permissions {
            validate_permissions(permissions)?;
        }

        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut roles = self.store.list_roles().await?;
        let role = roles
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| HrmsError::RoleNotFound(id.to_string()))?;
        role.apply(patch);
        let updated = role.clone();
        self.store.replace_roles(roles).await?;

        info!("Updated role {}", id);
        Ok(updated)
    }

    /// 删除自定义角色
    ///
    /// 种子默认角色的 ID 始终受保护，即使 `replace_roles` 写回了 `is_default = false`。
    /// 仍引用该角色的用户保持不变
    pub async fn delete_role(&self, id: &str) -> Result<()> {
        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut roles = self.store.list_roles().await?;
        if !roles.iter().any(|r| r.id == id) {
            return Err(HrmsError::RoleNotFound(id.to_string()));
        }
        let seeded_default = self
            .store
            .seeded_default_role_ids()
            .iter()
            .any(|seeded| seeded == id);
        if seeded_default || roles.iter().any(|r| r.id == id && r.is_default) {
            warn!("Rejected deletion of default role {}", id);
            return Err(HrmsError::DefaultRoleProtected(id.to_string()));
        }

        roles.retain(|r| r.id != id);
        self.store.replace_roles(roles).await?;

        info!("Deleted role {}", id);
        Ok(())
    }

    /// 整体替换角色集合，不做校验
    pub async fn replace_roles(&self, roles: Vec<Role>) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.store.replace_roles(roles).await
    }

    /// 恢复默认角色
    pub async fn reset_roles(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.store.reset_roles().await?;
        info!("Roles reset to seed data");
        Ok(())
    }
}

fn validate_permissions(permissions: &[Permission]) -> Result<()> {
    match permissions.iter().find(|p| !p.is_well_formed()) {
        Some(bad) => Err(HrmsError::InvalidPermission(bad.to_string())),
        None => Ok(()),
    }
}
