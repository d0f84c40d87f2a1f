// ==========================================
// 货运追踪系统 - 导入层
// ==========================================
// 职责: 历史运单平面文件 → 规范化实体
// 流程: 分词 → 映射/清洗 → 基础实体 → 国家对账 → 逐条创建 → 汇总
// ==========================================

// 模块声明
pub mod baseline;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod reconciler;
pub mod report;
pub mod shipment_importer_impl;
pub mod shipment_importer_trait;

// 重导出核心类型
pub use baseline::{Baseline, BaselineProvisioner};
pub use conflict_handler::{ConflictHandler, DuplicateTitle};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{FlatFileParser, FlatTable, RawRow};
pub use reconciler::{CountryMap, CountryReconciler};
pub use report::{write_failure_csv, ImportReporter};
pub use shipment_importer_impl::ShipmentImporterImpl;

// 重导出 Trait 接口
pub use shipment_importer_trait::{DataCleaner, FieldMapper, FileParser, ShipmentImporter};
