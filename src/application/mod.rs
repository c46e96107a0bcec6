//! 应用层：业务编排
//!
//! 用户服务、角色服务与会话上下文

pub mod role_service;
pub mod session;
pub mod user_service;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::latency::Latency;
use crate::core::store::{MemoryStore, Store};

pub use role_service::RoleService;
pub use session::SessionContext;
pub use user_service::UserService;

/// 服务行为选项
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceOptions {
    /// 模拟延迟
    pub latency: Latency,
    /// 创建/分配时校验 `role_id` 是否存在（默认关闭，允许孤立引用）
    pub strict_role_refs: bool,
    /// 启用严格状态机（默认关闭，任意状态可互相切换）
    pub strict_status_transitions: bool,
}

impl ServiceOptions {
    /// 无延迟、宽松规则，适合测试
    pub fn immediate() -> Self {
        Self {
            latency: Latency::none(),
            ..Default::default()
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn strict_role_refs(mut self, enabled: bool) -> Self {
        self.strict_role_refs = enabled;
        self
    }

    pub fn strict_status_transitions(mut self, enabled: bool) -> Self {
        self.strict_status_transitions = enabled;
        self
    }
}

/// 共享同一存储与写闸门的服务集合
pub struct Services {
    pub users: UserService,
    pub roles: RoleService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, options: ServiceOptions) -> Self {
        let write_gate = Arc::new(Mutex::new(()));
        Self {
            users: UserService::new(store.clone(), options, write_gate.clone()),
            roles: RoleService::new(store, options, write_gate),
        }
    }

    /// 基于默认种子数据的内存实例
    pub fn in_memory(options: ServiceOptions) -> Self {
        Self::new(Arc::new(MemoryStore::with_defaults()), options)
    }
}
