// ==========================================
// 货运追踪系统 - 国家参考数据对账
// ==========================================
// 两遍扫描:
//   第 1 遍: 收集所有不重复的 起运地/目的地 名称
//   第 2 遍: 逐个名称 find_first → 不存在则 create
// 红线: 运单循环内只查表，不再访问存储
// ==========================================

use crate::domain::{EntityId, EntityKind, ImportRecord, NewCountry};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{fields, EntityFilter, ImportStore, NewEntity};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info, warn};

// ==========================================
// CountryMap - 名称 → 国家 ID（构建后只读）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CountryMap {
    ids: BTreeMap<String, EntityId>,
    pub created: usize,
    pub reused: usize,
    pub failures: usize,
}

impl CountryMap {
    pub fn get(&self, name: &str) -> Option<EntityId> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 解析国家 ID，未命中时走兜底路径
    ///
    /// 兜底: 取映射表迭代顺序第一项（名称字典序最小），并告警
    ///
    /// # 返回
    /// - Ok(id): 命中或兜底成功
    /// - Err(UnresolvedCountry): 映射表为空
    pub fn resolve_country_with_fallback(&self, name: &str, row: usize) -> ImportResult<EntityId> {
        if let Some(id) = self.get(name) {
            return Ok(id);
        }

        match self.ids.iter().next() {
            Some((substitute, &id)) => {
                warn!(
                    row_number = row,
                    country = %name,
                    substitute = %substitute,
                    "国家未对账，使用兜底国家"
                );
                Ok(id)
            }
            None => Err(ImportError::UnresolvedCountry {
                row,
                name: name.to_string(),
            }),
        }
    }
}

pub struct CountryReconciler;

impl CountryReconciler {
    /// 第 1 遍: 收集不重复的国家名称
    ///
    /// 缺失的起运地/目的地已被清洗为 "Not specified"，按普通名称对账
    pub fn collect_names(&self, records: &[ImportRecord]) -> BTreeSet<String> {
        records
            .iter()
            .flat_map(|r| [r.origin.as_str(), r.destination.as_str()])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 第 2 遍: 按名称顺序查找或创建国家
    ///
    /// 单个名称的存储错误只记录并计数，不中断对账
    pub async fn reconcile(&self, store: &dyn ImportStore, records: &[ImportRecord]) -> CountryMap {
        let names = self.collect_names(records);
        debug!(distinct = names.len(), "国家名称收集完成");

        let mut map = CountryMap::default();
        for name in names {
            match self.find_or_create(store, &name).await {
                Ok((id, created)) => {
                    if created {
                        map.created += 1;
                    } else {
                        map.reused += 1;
                    }
                    map.ids.insert(name, id);
                }
                Err(e) => {
                    error!(country = %name, error = %e, "国家对账失败");
                    map.failures += 1;
                }
            }
        }

        info!(
            created = map.created,
            reused = map.reused,
            failures = map.failures,
            "国家对账完成"
        );
        map
    }

    async fn find_or_create(
        &self,
        store: &dyn ImportStore,
        name: &str,
    ) -> ImportResult<(EntityId, bool)> {
        let filter = EntityFilter::eq(fields::NAME, name);
        if let Some(existing) = store.find_first(EntityKind::Country, &filter).await? {
            return Ok((existing.id, false));
        }

        let created = store
            .create(NewEntity::Country(NewCountry::from_name(name)))
            .await?;
        debug!(country = %name, id = created.id, "已创建国家");
        Ok((created.id, true))
    }
}
