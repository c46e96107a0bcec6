//! 存储接口定义
//!
//! 角色与用户的“哑存储”：只提供读取、整体替换与重置，不做任何业务校验。
//! 规则由上层服务负责。

pub mod memory;

use async_trait::async_trait;

use crate::domain::{Role, User, UserStatus};
use crate::errors::Result;

pub use memory::MemoryStore;

/// 角色存储
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// 全部角色的快照（按插入顺序）
    async fn list_roles(&self) -> Result<Vec<Role>>;

    /// 整体替换，不校验重复 ID
    async fn replace_roles(&self, roles: Vec<Role>) -> Result<()>;

    /// 恢复为种子角色
    async fn reset_roles(&self) -> Result<()>;

    /// 种子中的默认角色 ID，不受 `replace_roles` 影响
    fn seeded_default_role_ids(&self) -> Vec<String>;

    /// 线性查找，返回第一个匹配项
    async fn find_role(&self, id: &str) -> Result<Option<Role>> {
        let roles = self.list_roles().await?;
        Ok(roles.into_iter().find(|r| r.id == id))
    }
}

/// 用户存储
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 全部用户的快照（按插入顺序）
    async fn list_users(&self) -> Result<Vec<User>>;

    /// 整体替换，不做校验
    async fn replace_users(&self, users: Vec<User>) -> Result<()>;

    /// 恢复为种子用户
    async fn reset_users(&self) -> Result<()>;

    /// 线性查找，找不到返回 `None`（不是错误）
    async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let users = self.list_users().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }
}

/// 同时持有角色与用户的存储
pub trait Store: RoleStore + UserStore {}

impl<T: RoleStore + UserStore> Store for T {}

/// 用户查询过滤器
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// 角色ID（精确匹配）
    pub role_id: Option<String>,
    /// 状态
    pub status: Option<UserStatus>,
    /// 部门（精确匹配）
    pub department: Option<String>,
    /// 模糊搜索：姓名、邮箱、工号（不区分大小写）
    pub search: Option<String>,
    /// 最大返回数量
    pub limit: Option<usize>,
}

impl UserFilter {
    /// 创建新的过滤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置角色
    pub fn role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    /// 设置状态
    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// 设置部门
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// 设置搜索关键字
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    /// 设置返回数量限制
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(ref role_id) = self.role_id {
            if user.role_id != *role_id {
                return false;
            }
        }

        if let Some(status) = self.status {
            if user.status != status {
                return false;
            }
        }

        if let Some(ref department) = self.department {
            if user.department.as_deref() != Some(department.as_str()) {
                return false;
            }
        }

        if let Some(ref query) = self.search {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let haystacks = [
                    Some(user.full_name()),
                    Some(user.email.clone()),
                    user.employee_id.clone(),
                ];
                let hit = haystacks
                    .iter()
                    .flatten()
                    .any(|h| h.to_lowercase().contains(&query));
                if !hit {
                    return false;
                }
            }
        }

        true
    }

    /// 过滤并截断，保持原有顺序
    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let matched = users.into_iter().filter(|u| self.matches(u));
        match self.limit {
            Some(n) => matched.take(n).collect(),
            None => matched.collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed::default_users;

    #[test]
    fn test_user_filter_builder() {
        let filter = UserFilter::new()
            .role("employee")
            .status(UserStatus::Active)
            .department("Engineering")
            .search("emily")
            .limit(5);

        assert_eq!(filter.role_id, Some("employee".to_string()));
        assert_eq!(filter.status, Some(UserStatus::Active));
        assert_eq!(filter.department, Some("Engineering".to_string()));
        assert_eq!(filter.search, Some("emily".to_string()));
        assert_eq!(filter.limit, Some(5));
    }

    #[test]
    fn test_user_filter_apply() {
        let users = default_users();

        let engineers = UserFilter::new().department("Engineering").apply(users.clone());
        assert_eq!(engineers.len(), 3);

        let active_employees = UserFilter::new()
            .role("employee")
            .status(UserStatus::Active)
            .apply(users.clone());
        assert_eq!(active_employees.len(), 2);

        let by_name = UserFilter::new().search("  CHEN ").apply(users.clone());
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "4");

        let by_employee_id = UserFilter::new().search("emp007").apply(users.clone());
        assert_eq!(by_employee_id[0].id, "7");

        let limited = UserFilter::new().limit(2).apply(users.clone());
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, "1");

        assert_eq!(UserFilter::new().apply(users).len(), 8);
    }
}
