// ==========================================
// 货运追踪系统 - 领域模型层
// ==========================================
// 职责: 定义导入管道涉及的实体字段集、类型与报告
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod reference;
pub mod report;
pub mod shipment;
pub mod types;

// 重导出核心类型
pub use reference::{NewBranch, NewCountry, NewShipmentStatus, NewUser};
pub use report::{ImportReport, RecordFailure};
pub use shipment::{DateField, ImportRecord, NewShipment, NOT_SPECIFIED};
pub use types::{
    CountryKind, EntityId, EntityKind, PaymentMethod, PaymentStatus, UserRole,
};
