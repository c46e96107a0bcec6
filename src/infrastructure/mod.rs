//! 基础设施层：外部系统交互
//!
//! 提供日志、SQLite 持久化和 HTTP API

pub mod logger;
pub mod store;
pub mod web;
