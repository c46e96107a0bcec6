//! User Directory Models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::next_stamp;
use crate::errors::{HrmsError, Result};

/// 自动生成工号的前缀
pub const EMPLOYEE_ID_PREFIX: &str = "EMP";

/// User Status Enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    /// 新建用户的初始状态
    #[default]
    Pending,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Pending => "pending",
        }
    }

    /// 严格状态机：`pending -> active`，`active <-> inactive`，同状态视为无操作
    pub fn can_transition_to(self, next: UserStatus) -> bool {
        use UserStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Active)
                | (Active, Active)
                | (Active, Inactive)
                | (Inactive, Inactive)
                | (Inactive, Active)
        )
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "pending" => Ok(UserStatus::Pending),
            _ => Err(format!("Unknown user status: {}", s)),
        }
    }
}

/// User Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role_id: String,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 合并补丁中出现的字段，并刷新 `updated_at`（严格递增）
    pub fn apply(&mut self, patch: UpdateUserInput) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = Some(avatar);
        }
        if let Some(role_id) = patch.role_id {
            self.role_id = role_id;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(department) = patch.department {
            self.department = Some(department);
        }
        if let Some(designation) = patch.designation {
            self.designation = Some(designation);
        }
        if let Some(employee_id) = patch.employee_id {
            self.employee_id = Some(employee_id);
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        self.updated_at = next_stamp(self.updated_at);
    }
}

/// 创建用户的请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    /// 留空时自动分配下一个 `EMP###`
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreateUserInput {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role_id: role_id.into(),
            ..Default::default()
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }
}

/// 更新用户的请求体，缺省字段保持不变
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub role_id: Option<String>,
    pub status: Option<UserStatus>,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub employee_id: Option<String>,
    pub phone: Option<String>,
}

impl UpdateUserInput {
    pub fn role(role_id: impl Into<String>) -> Self {
        Self {
            role_id: Some(role_id.into()),
            ..Default::default()
        }
    }

    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// 解析 `EMP###` 的数字部分；非该格式返回 `None`
fn employee_digits(employee_id: &str) -> Option<&str> {
    let digits = employee_id.strip_prefix(EMPLOYEE_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits)
}

fn employee_seq(employee_id: &str) -> Result<Option<u128>> {
    match employee_digits(employee_id) {
        Some(digits) => digits.parse().map(Some).map_err(|_| {
            HrmsError::Validation(format!("employee id out of range: {}", employee_id))
        }),
        None => Ok(None),
    }
}

/// 检查显式给出的工号，保证之后仍能分配下一个序号
pub fn validate_employee_id(employee_id: &str) -> Result<()> {
    match employee_seq(employee_id)? {
        Some(u128::MAX) => Err(HrmsError::Validation(format!(
            "employee id out of range: {}",
            employee_id
        ))),
        _ => Ok(()),
    }
}

/// 下一个工号：现有最大序号 + 1，至少补零到 3 位
pub fn next_employee_id<'a, I>(existing: I) -> Result<String>
where
    I: IntoIterator<Item = &'a User>,
{
    let mut max: u128 = 0;
    for id in existing.into_iter().filter_map(|u| u.employee_id.as_deref()) {
        if let Some(seq) = employee_seq(id)? {
            max = max.max(seq);
        }
    }
    let next = max
        .checked_add(1)
        .ok_or_else(|| HrmsError::Validation("employee id sequence exhausted".to_string()))?;
    Ok(format!("{}{:03}", EMPLOYEE_ID_PREFIX, next))
}

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成用户 ID：毫秒时间戳（36 进制）+ 随机后缀
///
/// 不保证密码学意义上的唯一性
pub fn generate_user_id(now_millis: i64) -> String {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    format!("{}{}", to_base36(now_millis.max(0) as u64), suffix)
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
