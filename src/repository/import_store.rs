// ==========================================
// 货运追踪系统 - 导入持久化端口 Trait
// ==========================================
// 职责: 导入管道唯一依赖的两种存储操作
//   - find_first(kind, filter) -> Option<EntityRef>
//   - create(entity) -> EntityRef
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{
    EntityId, EntityKind, NewBranch, NewCountry, NewShipment, NewShipmentStatus, NewUser,
};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::Serialize;

/// 可用于过滤的字段名
pub mod fields {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const SHIPMENT_NUMBER: &str = "shipment_number";
}

// ==========================================
// EntityFilter - 查询条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityFilter {
    /// 任意一条（按主键顺序取第一条）
    Any,
    /// 字段精确相等
    Eq { field: &'static str, value: String },
}

impl EntityFilter {
    pub fn eq(field: &'static str, value: impl Into<String>) -> Self {
        EntityFilter::Eq {
            field,
            value: value.into(),
        }
    }
}

// ==========================================
// EntityRef - 已持久化实体引用
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: EntityId,
}

// ==========================================
// NewEntity - 待创建实体
// ==========================================
#[derive(Debug, Clone)]
pub enum NewEntity {
    Country(NewCountry),
    ShipmentStatus(NewShipmentStatus),
    Branch(NewBranch),
    User(NewUser),
    Shipment(Box<NewShipment>),
}

impl NewEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            NewEntity::Country(_) => EntityKind::Country,
            NewEntity::ShipmentStatus(_) => EntityKind::ShipmentStatus,
            NewEntity::Branch(_) => EntityKind::Branch,
            NewEntity::User(_) => EntityKind::User,
            NewEntity::Shipment(_) => EntityKind::Shipment,
        }
    }

    /// 读取可过滤字段的值（None = 该实体无此字段）
    pub fn field_value(&self, field: &str) -> Option<&str> {
        match (self, field) {
            (NewEntity::Country(c), fields::NAME) => Some(&c.name),
            (NewEntity::ShipmentStatus(s), fields::NAME) => Some(&s.name),
            (NewEntity::Branch(b), fields::NAME) => Some(&b.name),
            (NewEntity::User(u), fields::NAME) => Some(&u.name),
            (NewEntity::User(u), fields::EMAIL) => Some(&u.email),
            (NewEntity::Shipment(s), fields::SHIPMENT_NUMBER) => Some(&s.shipment_number),
            _ => None,
        }
    }

    /// 唯一约束字段
    pub fn unique_field(&self) -> Option<&'static str> {
        match self {
            NewEntity::Country(_) | NewEntity::ShipmentStatus(_) => Some(fields::NAME),
            NewEntity::User(_) => Some(fields::EMAIL),
            NewEntity::Shipment(_) => Some(fields::SHIPMENT_NUMBER),
            NewEntity::Branch(_) => None,
        }
    }
}

/// 某实体种类是否支持按该字段过滤
pub fn is_filterable(kind: EntityKind, field: &str) -> bool {
    matches!(
        (kind, field),
        (EntityKind::Country, fields::NAME)
            | (EntityKind::ShipmentStatus, fields::NAME)
            | (EntityKind::Branch, fields::NAME)
            | (EntityKind::User, fields::NAME)
            | (EntityKind::User, fields::EMAIL)
            | (EntityKind::Shipment, fields::SHIPMENT_NUMBER)
    )
}

// ==========================================
// ImportStore Trait
// ==========================================
// 实现者: SqliteImportStore（rusqlite）、InMemoryImportStore（测试/嵌入）
#[async_trait]
pub trait ImportStore: Send + Sync {
    /// 查询第一条满足条件的实体
    ///
    /// # 返回
    /// - Ok(Some(EntityRef)): 找到
    /// - Ok(None): 不存在
    /// - Err: 存储错误 / 不支持的过滤字段
    async fn find_first(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> RepositoryResult<Option<EntityRef>>;

    /// 创建实体
    ///
    /// # 返回
    /// - Ok(EntityRef): 新实体引用
    /// - Err: 唯一约束违反 / 存储错误
    async fn create(&self, entity: NewEntity) -> RepositoryResult<EntityRef>;
}
