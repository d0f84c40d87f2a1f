// ==========================================
// 货运追踪系统 - 历史运单导入核心库
// ==========================================
// 技术栈: Rust + SQLite
// 定位: 旧系统导出文件 → 规范化实体（幂等、失败隔离）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体字段集与类型
pub mod domain;

// 数据仓储层 - 持久化端口
pub mod repository;

// 导入层 - 导入管道
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, ImportConfig};
pub use domain::{ImportRecord, ImportReport, NewShipment, RecordFailure};
pub use importer::{ImportError, ImportResult, ShipmentImporter, ShipmentImporterImpl};
pub use repository::{ImportStore, InMemoryImportStore, SqliteImportStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "shipment-import";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
