//! 用户服务
//!
//! 在用户存储之上执行业务规则：邮箱唯一、工号递增、存在性检查。
//! 所有“读取-计算-写回”序列都在写闸门内完成，并发调用不会分配重复工号，
//! 也不会绕过邮箱查重。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::store::{Store, UserFilter};
use crate::domain::user::{generate_user_id, next_employee_id, validate_employee_id};
use crate::domain::{now_millis, CreateUserInput, UpdateUserInput, User, UserStatus};
use crate::errors::{HrmsError, Result};
use crate::infrastructure::logger::Sanitizer;

use super::ServiceOptions;

/// 用户服务
pub struct UserService {
    store: Arc<dyn Store>,
    options: ServiceOptions,
    write_gate: Arc<Mutex<()>>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, options: ServiceOptions, write_gate: Arc<Mutex<()>>) -> Self {
        Self {
            store,
            options,
            write_gate,
        }
    }

    /// 所有用户
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.options.latency.list().await;
        let users = self.store.list_users().await?;
        debug!("Loaded {} users", users.len());
        Ok(users)
    }

    /// 按 ID 查询，找不到返回 `None`
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.options.latency.lookup().await;
        self.store.find_user(id).await
    }

    /// 按角色筛选（精确匹配）
    pub async fn get_users_by_role(&self, role_id: &str) -> Result<Vec<User>> {
        self.find_users(UserFilter::new().role(role_id)).await
    }

    /// 按过滤器查询
    pub async fn find_users(&self, filter: UserFilter) -> Result<Vec<User>> {
        self.options.latency.list().await;
        let users = self.store.list_users().await?;
        Ok(filter.apply(users))
    }

    /// 创建用户
    ///
    /// 新用户状态为 `pending`；未指定工号时分配下一个 `EMP###`
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User> {
        if let Some(ref employee_id) = input.employee_id {
            validate_employee_id(employee_id)?;
        }

        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut users = self.store.list_users().await?;
        if users.iter().any(|u| u.email == input.email) {
            warn!(
                "Rejected user creation, email already in use: {}",
                Sanitizer::email(&input.email)
            );
            return Err(HrmsError::DuplicateEmail(input.email));
        }
        if self.options.strict_role_refs {
            self.ensure_role_exists(&input.role_id).await?;
        }

        let now = now_millis();
        let employee_id = match input.employee_id {
            Some(employee_id) => employee_id,
            None => next_employee_id(&users)?,
        };
        let user = User {
            id: generate_user_id(now),
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            avatar: input.avatar,
            role_id: input.role_id,
            status: UserStatus::Pending,
            department: input.department,
            designation: input.designation,
            employee_id: Some(employee_id),
            phone: input.phone,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        self.store.replace_users(users).await?;

        info!(
            "Created user {} ({}) as {}",
            user.id,
            user.employee_id.as_deref().unwrap_or("-"),
            user.role_id
        );
        Ok(user)
    }

    /// 更新用户，补丁中缺省的字段保持不变
    pub async fn update_user(&self, id: &str, patch: UpdateUserInput) -> Result<User> {
        if let Some(ref employee_id) = patch.employee_id {
            validate_employee_id(employee_id)?;
        }

        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut users = self.store.list_users().await?;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| HrmsError::NotFound(id.to_string()))?;

        if let Some(ref email) = patch.email {
            // 改成自己当前的邮箱不算冲突
            if *email != users[index].email
                && users
                    .iter()
                    .enumerate()
                    .any(|(i, u)| i != index && u.email == *email)
            {
                warn!(
                    "Rejected update of {}, email already in use: {}",
                    id,
                    Sanitizer::email(email)
                );
                return Err(HrmsError::DuplicateEmail(email.clone()));
            }
        }

        if self.options.strict_role_refs {
            if let Some(ref role_id) = patch.role_id {
                self.ensure_role_exists(role_id).await?;
            }
        }

        if self.options.strict_status_transitions {
            if let Some(next) = patch.status {
                let current = users[index].status;
                if !current.can_transition_to(next) {
                    return Err(HrmsError::InvalidStatusTransition {
                        from: current,
                        to: next,
                    });
                }
            }
        }

        users[index].apply(patch);
        let updated = users[index].clone();
        self.store.replace_users(users).await?;

        info!("Updated user {}", id);
        Ok(updated)
    }

    /// 分配角色，等价于只含 `role_id` 的 `update_user`
    pub async fn assign_user_role(&self, user_id: &str, role_id: &str) -> Result<User> {
        self.update_user(user_id, UpdateUserInput::role(role_id)).await
    }

    /// 删除用户
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.options.latency.mutate().await;
        let _gate = self.write_gate.lock().await;

        let mut users = self.store.list_users().await?;
        if !users.iter().any(|u| u.id == id) {
            return Err(HrmsError::NotFound(id.to_string()));
        }
        users.retain(|u| u.id != id);
        self.store.replace_users(users).await?;

        info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn activate_user(&self, id: &str) -> Result<User> {
        self.update_user(id, UpdateUserInput::status(UserStatus::Active))
            .await
    }

    pub async fn deactivate_user(&self, id: &str) -> Result<User> {
        self.update_user(id, UpdateUserInput::status(UserStatus::Inactive))
            .await
    }

    /// 恢复种子用户
    pub async fn reset_users(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;
        self.store.reset_users().await?;
        info!("User directory reset to seed data");
        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: &str) -> Result<()> {
        match self.store.find_role(role_id).await? {
            Some(_) => Ok(()),
            None => {
                warn!("Rejected reference to unknown role: {}", role_id);
                Err(HrmsError::RoleNotFound(role_id.to_string()))
            }
        }
    }
}
