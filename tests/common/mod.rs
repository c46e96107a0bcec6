//! 测试通用工具
//!
//! 提供测试辅助函数和通用测试工具

#![allow(dead_code)]

use std::sync::Once;

use hrms_core::{CreateUserInput, ServiceOptions, Services};

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn setup() {
    INIT.call_once(|| {
        // 设置测试日志
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// 无延迟、宽松规则的内存服务
pub fn services() -> Services {
    setup();
    Services::in_memory(ServiceOptions::immediate())
}

/// 自定义选项的内存服务
pub fn services_with(options: ServiceOptions) -> Services {
    setup();
    Services::in_memory(options)
}

/// 创建测试用的用户输入
pub fn new_user(email: &str) -> CreateUserInput {
    CreateUserInput::new(email, "Test", "User", "employee").with_department("Engineering")
}
