//! 内存存储实现
//!
//! 默认的存储实现，数据仅在内存中，重启后丢失

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Role, SeedData, User};
use crate::errors::Result;

use super::{RoleStore, UserStore};

/// 内存存储
///
/// 初始状态由 `SeedData` 注入，`reset` 恢复到该状态。每个实例相互隔离，
/// 适合测试和演示环境
pub struct MemoryStore {
    seed: SeedData,
    roles: RwLock<Vec<Role>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    /// 以给定种子数据创建内存存储
    pub fn new(seed: SeedData) -> Self {
        Self {
            roles: RwLock::new(seed.roles.clone()),
            users: RwLock::new(seed.users.clone()),
            seed,
        }
    }

    /// 使用内置的默认角色和员工
    pub fn with_defaults() -> Self {
        Self::new(SeedData::default())
    }

    pub fn seed(&self) -> &SeedData {
        &self.seed
    }

    /// 角色和用户同时恢复到种子数据
    pub async fn reset(&self) {
        *self.roles.write().await = self.seed.roles.clone();
        *self.users.write().await = self.seed.users.clone();
    }

    /// 清空全部数据，之后的读取返回空集合，直到再次 `reset`
    pub async fn dispose(&self) {
        self.roles.write().await.clear();
        self.users.write().await.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        Ok(self.roles.read().await.clone())
    }

    async fn replace_roles(&self, roles: Vec<Role>) -> Result<()> {
        *self.roles.write().await = roles;
        Ok(())
    }

    async fn reset_roles(&self) -> Result<()> {
        *self.roles.write().await = self.seed.roles.clone();
        Ok(())
    }

    fn seeded_default_role_ids(&self) -> Vec<String> {
        self.seed.default_role_ids()
    }

    async fn find_role(&self, id: &str) -> Result<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.iter().find(|r| r.id == id).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn replace_users(&self, users: Vec<User>) -> Result<()> {
        *self.users.write().await = users;
        Ok(())
    }

    async fn reset_users(&self) -> Result<()> {
        *self.users.write().await = self.seed.users.clone();
        Ok(())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}
