// ==========================================
// 货运追踪系统 - 导入持久化端口内存实现
// ==========================================
// 用途: 测试替身 / 嵌入式场景
// 约束: 与 SQLite 实现保持相同的唯一约束语义
// ==========================================

use crate::domain::{EntityId, EntityKind, NewShipment};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_store::{
    fields, is_filterable, EntityFilter, EntityRef, ImportStore, NewEntity,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    next_id: EntityId,
    rows: HashMap<EntityKind, Vec<(EntityId, NewEntity)>>,
    create_calls: HashMap<EntityKind, usize>,
}

// ==========================================
// InMemoryImportStore
// ==========================================
#[derive(Default)]
pub struct InMemoryImportStore {
    state: Mutex<MemoryState>,
}

impl InMemoryImportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 某实体种类的现存数量
    pub fn count(&self, kind: EntityKind) -> usize {
        self.lock()
            .map(|s| s.rows.get(&kind).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// 某实体种类的 create 调用次数（含失败的调用）
    pub fn create_calls(&self, kind: EntityKind) -> usize {
        self.lock()
            .map(|s| s.create_calls.get(&kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// 按运单号取出已存运单
    pub fn shipment(&self, shipment_number: &str) -> Option<NewShipment> {
        let state = self.lock().ok()?;
        state
            .rows
            .get(&EntityKind::Shipment)?
            .iter()
            .find_map(|(_, entity)| match entity {
                NewEntity::Shipment(s) if s.shipment_number == shipment_number => {
                    Some(s.as_ref().clone())
                }
                _ => None,
            })
    }

    /// 所有运单号（按创建顺序）
    pub fn shipment_numbers(&self) -> Vec<String> {
        self.lock()
            .map(|state| {
                state
                    .rows
                    .get(&EntityKind::Shipment)
                    .map(|rows| {
                        rows.iter()
                            .filter_map(|(_, e)| e.field_value(fields::SHIPMENT_NUMBER))
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImportStore for InMemoryImportStore {
    async fn find_first(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> RepositoryResult<Option<EntityRef>> {
        if let EntityFilter::Eq { field, .. } = filter {
            if !is_filterable(kind, field) {
                return Err(RepositoryError::UnsupportedFilterField {
                    entity: kind.to_string(),
                    field: field.to_string(),
                });
            }
        }

        let state = self.lock()?;
        let found = state.rows.get(&kind).and_then(|rows| {
            rows.iter().find(|(_, entity)| match filter {
                EntityFilter::Any => true,
                EntityFilter::Eq { field, value } => {
                    entity.field_value(field) == Some(value.as_str())
                }
            })
        });

        Ok(found.map(|(id, _)| EntityRef { kind, id: *id }))
    }

    async fn create(&self, entity: NewEntity) -> RepositoryResult<EntityRef> {
        let mut state = self.lock()?;
        let kind = entity.kind();
        *state.create_calls.entry(kind).or_insert(0) += 1;

        if let Some(field) = entity.unique_field() {
            let value = entity.field_value(field);
            let taken = state
                .rows
                .get(&kind)
                .map_or(false, |rows| rows.iter().any(|(_, e)| e.field_value(field) == value));
            if taken {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "{}.{} = {}",
                    kind.table_name(),
                    field,
                    value.unwrap_or_default()
                )));
            }
        }

        state.next_id += 1;
        let id = state.next_id;
        state.rows.entry(kind).or_default().push((id, entity));
        Ok(EntityRef { kind, id })
    }
}
