// ==========================================
// 货运追踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供导入持久化端口及其实现,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod import_store;
pub mod memory_store;
pub mod sqlite_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use import_store::{fields, EntityFilter, EntityRef, ImportStore, NewEntity};
pub use memory_store::InMemoryImportStore;
pub use sqlite_store::SqliteImportStore;
