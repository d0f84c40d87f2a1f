// ==========================================
// 货运追踪系统 - 配置层
// ==========================================
// 职责: 导入配置默认值与覆写管理
// 存储: 目标库 config_kv 表；路径另可由环境变量指定
// ==========================================

pub mod config_manager;
pub mod import_config;
pub mod paths;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use import_config::ImportConfig;
