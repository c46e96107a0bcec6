//! 模拟网络延迟
//!
//! 服务层在访问存储前等待一段时间，模拟未来远程 API 的异步行为。
//! 测试中使用 `Latency::none()`。

use std::time::Duration;

/// 各类操作的模拟延迟
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// 列表查询
    pub list: Duration,
    /// 单条查询
    pub lookup: Duration,
    /// 写操作
    pub mutate: Duration,
}

impl Latency {
    /// 不等待
    pub const fn none() -> Self {
        Self {
            list: Duration::ZERO,
            lookup: Duration::ZERO,
            mutate: Duration::ZERO,
        }
    }

    /// 默认演示延迟：列表 100ms，单条 50ms，写入 100ms
    pub const fn mock() -> Self {
        Self::from_millis(100)
    }

    /// 以列表延迟为基准，单条查询取一半
    pub const fn from_millis(list_ms: u64) -> Self {
        Self {
            list: Duration::from_millis(list_ms),
            lookup: Duration::from_millis(list_ms / 2),
            mutate: Duration::from_millis(list_ms),
        }
    }

    pub async fn list(&self) {
        pause(self.list).await
    }

    pub async fn lookup(&self) {
        pause(self.lookup).await
    }

    pub async fn mutate(&self) {
        pause(self.mutate).await
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::mock()
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
