//! 配置管理
//!
//! 命令行参数与环境变量（支持 `.env`）

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::application::{ServiceOptions, Services};
use crate::core::latency::Latency;
use crate::core::store::{MemoryStore, Store};
use crate::domain::SeedData;
use crate::errors::{HrmsError, Result};
use crate::infrastructure::logger::{LogConfig, LogFormat};
use crate::infrastructure::store::SqliteStore;

/// 存储类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreType {
    Memory,
    Sqlite,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreType::Memory),
            "sqlite" => Ok(StoreType::Sqlite),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Memory => write!(f, "memory"),
            StoreType::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HRMS role and employee directory service")]
pub struct AppConfig {
    /// HTTP 监听地址
    #[arg(long, env = "HRMS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    // 存储配置
    /// 存储类型: memory, sqlite
    #[arg(long, env = "HRMS_STORE_TYPE", default_value = "memory")]
    pub store_type: StoreType,

    /// SQLite 数据库路径（仅 sqlite 存储类型使用）
    #[arg(long, env = "HRMS_STORE_PATH", default_value = "./hrms.db")]
    pub store_path: PathBuf,

    /// 种子数据 YAML 文件，缺省时使用内置的默认角色和员工
    #[arg(long, env = "HRMS_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    // 服务行为
    /// 列表查询的模拟延迟（毫秒），单条查询取一半
    #[arg(long, env = "HRMS_LATENCY_MS", default_value_t = 100)]
    pub latency_ms: u64,

    /// 创建/分配时校验角色是否存在
    #[arg(long, env = "HRMS_STRICT_ROLE_REFS")]
    pub strict_role_refs: bool,

    /// 启用严格的用户状态机
    #[arg(long, env = "HRMS_STRICT_STATUS_TRANSITIONS")]
    pub strict_status_transitions: bool,

    // 日志配置
    /// 日志级别（RUST_LOG 优先）
    #[arg(long, env = "HRMS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// 日志格式: pretty, compact, json
    #[arg(long, env = "HRMS_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions::default()
            .with_latency(Latency::from_millis(self.latency_ms))
            .strict_role_refs(self.strict_role_refs)
            .strict_status_transitions(self.strict_status_transitions)
    }

    /// 加载种子数据
    pub fn seed(&self) -> Result<SeedData> {
        match self.seed_file {
            Some(ref path) => SeedData::from_yaml_file(path).map_err(|e| {
                HrmsError::Config(format!("Failed to load seed file {}: {}", path.display(), e))
            }),
            None => Ok(SeedData::default()),
        }
    }

    /// 按配置构建存储
    pub fn build_store(&self) -> Result<Arc<dyn Store>> {
        let seed = self.seed()?;
        let store: Arc<dyn Store> = match self.store_type {
            StoreType::Memory => Arc::new(MemoryStore::new(seed)),
            StoreType::Sqlite => Arc::new(SqliteStore::new(&self.store_path, seed)?),
        };
        Ok(store)
    }

    pub fn build_services(&self) -> Result<Services> {
        Ok(Services::new(self.build_store()?, self.service_options()))
    }
}
