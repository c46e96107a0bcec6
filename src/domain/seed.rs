//! 种子数据
//!
//! 五个默认角色与八名示例员工。时间戳固定，保证重置后的记录逐字段一致。

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::permission::default_permissions;
use super::role::Role;
use super::user::{User, UserStatus};
use crate::errors::Result;

/// 种子记录统一使用的时间戳（2024-01-01T00:00:00Z）
pub const SEED_TIMESTAMP: i64 = 1_704_067_200_000;

/// 默认角色 ID
pub const DEFAULT_ROLE_IDS: [&str; 5] = [
    "admin",
    "hr_manager",
    "finance_manager",
    "team_lead",
    "employee",
];

/// 存储的初始状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl SeedData {
    pub fn new(roles: Vec<Role>, users: Vec<User>) -> Self {
        Self { roles, users }
    }

    /// 空数据集
    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }

    /// 种子中标记为默认的角色 ID
    pub fn default_role_ids(&self) -> Vec<String> {
        self.roles
            .iter()
            .filter(|r| r.is_default)
            .map(|r| r.id.clone())
            .collect()
    }

    /// 从 YAML 文本加载
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// 从 YAML 文件加载
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::new(default_roles(), default_users())
    }
}

fn seeded_role(id: &str, name: &str, description: &str) -> Role {
    Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        permissions: default_permissions(id),
        is_default: true,
        created_at: SEED_TIMESTAMP,
        updated_at: SEED_TIMESTAMP,
    }
}

/// 五个内置角色
pub fn default_roles() -> Vec<Role> {
    vec![
        seeded_role("admin", "Administrator", "Full access to every module"),
        seeded_role(
            "hr_manager",
            "HR Manager",
            "Manages employees, attendance and leave",
        ),
        seeded_role(
            "finance_manager",
            "Finance Manager",
            "Manages payroll and expenses",
        ),
        seeded_role(
            "team_lead",
            "Team Lead",
            "Oversees a team and approves its requests",
        ),
        seeded_role("employee", "Employee", "Self-service access"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seeded_user(
    id: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    role_id: &str,
    status: UserStatus,
    department: &str,
    designation: &str,
    phone: &str,
) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        avatar: None,
        role_id: role_id.to_string(),
        status,
        department: Some(department.to_string()),
        designation: Some(designation.to_string()),
        employee_id: Some(format!("EMP{:03}", id.parse::<u32>().unwrap_or(0))),
        phone: Some(phone.to_string()),
        created_at: SEED_TIMESTAMP,
        updated_at: SEED_TIMESTAMP,
    }
}

/// 八名示例员工（EMP001..EMP008）
#[rustfmt::skip]
pub fn default_users() -> Vec<User> {
    use UserStatus::*;
    vec![
        seeded_user("1", "sarah.mitchell@acme-hr.com", "Sarah", "Mitchell", "admin", Active, "Administration", "System Administrator", "+1 555-0101"),
        seeded_user("2", "james.carter@acme-hr.com", "James", "Carter", "hr_manager", Active, "Human Resources", "HR Manager", "+1 555-0102"),
        seeded_user("3", "priya.sharma@acme-hr.com", "Priya", "Sharma", "finance_manager", Active, "Finance", "Finance Manager", "+1 555-0103"),
        seeded_user("4", "david.chen@acme-hr.com", "David", "Chen", "team_lead", Active, "Engineering", "Engineering Lead", "+1 555-0104"),
        seeded_user("5", "emily.rodriguez@acme-hr.com", "Emily", "Rodriguez", "employee", Active, "Engineering", "Software Engineer", "+1 555-0105"),
        seeded_user("6", "michael.brown@acme-hr.com", "Michael", "Brown", "employee", Active, "Marketing", "Marketing Specialist", "+1 555-0106"),
        seeded_user("7", "aisha.khan@acme-hr.com", "Aisha", "Khan", "employee", Inactive, "Sales", "Sales Executive", "+1 555-0107"),
        seeded_user("8", "tom.wilson@acme-hr.com", "Tom", "Wilson", "employee", Pending, "Engineering", "QA Engineer", "+1 555-0108"),
    ]
}
