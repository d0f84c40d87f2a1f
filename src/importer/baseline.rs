// ==========================================
// 货运追踪系统 - 基础实体准备
// ==========================================
// 顺序: 默认状态 → 分支机构 → 操作员
// 规则: 先查后建，跨多次运行幂等
// 红线: 任一步失败即终止整批（运单缺少有效引用无法创建）
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{
    EntityId, EntityKind, NewBranch, NewShipmentStatus, NewUser, UserRole,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{fields, EntityFilter, ImportStore, NewEntity, RepositoryError};
use tracing::info;

/// 导入运单所需的基础实体 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub status_id: EntityId,
    pub branch_id: EntityId,
    pub user_id: EntityId,
}

pub struct BaselineProvisioner<'a> {
    config: &'a ImportConfig,
}

impl<'a> BaselineProvisioner<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self { config }
    }

    pub async fn provision(&self, store: &dyn ImportStore) -> ImportResult<Baseline> {
        let status_id = self.ensure_status(store).await?;
        let branch_id = self.ensure_branch(store).await?;
        let user_id = self.ensure_operator(store, branch_id).await?;

        let baseline = Baseline {
            status_id,
            branch_id,
            user_id,
        };
        info!(
            status_id = baseline.status_id,
            branch_id = baseline.branch_id,
            user_id = baseline.user_id,
            "基础实体准备完成"
        );
        Ok(baseline)
    }

    /// 默认运单状态（按名称查找）
    async fn ensure_status(&self, store: &dyn ImportStore) -> ImportResult<EntityId> {
        let filter = EntityFilter::eq(fields::NAME, self.config.default_status_name.as_str());
        let existing = store
            .find_first(EntityKind::ShipmentStatus, &filter)
            .await
            .map_err(|e| baseline_error(EntityKind::ShipmentStatus, e))?;
        if let Some(found) = existing {
            return Ok(found.id);
        }

        let status = NewShipmentStatus {
            name: self.config.default_status_name.clone(),
            color: self.config.default_status_color.clone(),
            description: Some(self.config.default_status_description.clone()),
            sort_order: 0,
        };
        let created = store
            .create(NewEntity::ShipmentStatus(status))
            .await
            .map_err(|e| baseline_error(EntityKind::ShipmentStatus, e))?;
        info!(name = %self.config.default_status_name, id = created.id, "已创建默认运单状态");
        Ok(created.id)
    }

    /// 任一分支机构，不存在则创建默认分支
    async fn ensure_branch(&self, store: &dyn ImportStore) -> ImportResult<EntityId> {
        let existing = store
            .find_first(EntityKind::Branch, &EntityFilter::Any)
            .await
            .map_err(|e| baseline_error(EntityKind::Branch, e))?;
        if let Some(found) = existing {
            return Ok(found.id);
        }

        let branch = NewBranch {
            name: self.config.default_branch_name.clone(),
            location: self.config.default_branch_location.clone(),
            manager: self.config.default_branch_manager.clone(),
            email: self.config.default_branch_email.clone(),
            phone: self.config.default_branch_phone.clone(),
        };
        let created = store
            .create(NewEntity::Branch(branch))
            .await
            .map_err(|e| baseline_error(EntityKind::Branch, e))?;
        info!(name = %self.config.default_branch_name, id = created.id, "已创建默认分支机构");
        Ok(created.id)
    }

    /// 任一用户，不存在则创建默认操作员（角色 manager）
    async fn ensure_operator(
        &self,
        store: &dyn ImportStore,
        branch_id: EntityId,
    ) -> ImportResult<EntityId> {
        let existing = store
            .find_first(EntityKind::User, &EntityFilter::Any)
            .await
            .map_err(|e| baseline_error(EntityKind::User, e))?;
        if let Some(found) = existing {
            return Ok(found.id);
        }

        let password_hash = bcrypt::hash(
            &self.config.default_operator_password,
            self.config.password_hash_cost,
        )
        .map_err(|e| {
            baseline_error(
                EntityKind::User,
                RepositoryError::InternalError(format!("密码哈希失败: {}", e)),
            )
        })?;

        let user = NewUser {
            name: self.config.default_operator_name.clone(),
            email: self.config.default_operator_email.clone(),
            password_hash,
            role: UserRole::Manager,
            branch_id: Some(branch_id),
        };
        let created = store
            .create(NewEntity::User(user))
            .await
            .map_err(|e| baseline_error(EntityKind::User, e))?;
        info!(email = %self.config.default_operator_email, id = created.id, "已创建默认操作员");
        Ok(created.id)
    }
}

fn baseline_error(kind: EntityKind, source: RepositoryError) -> ImportError {
    ImportError::Baseline {
        entity: kind.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryImportStore;

    fn fast_config() -> ImportConfig {
        ImportConfig {
            password_hash_cost: 4,
            ..ImportConfig::default()
        }
    }

    #[tokio::test]
    async fn test_provision_creates_each_entity_once() {
        let store = InMemoryImportStore::new();
        let config = fast_config();
        let provisioner = BaselineProvisioner::new(&config);

        let first = provisioner.provision(&store).await.unwrap();
        let second = provisioner.provision(&store).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.create_calls(EntityKind::ShipmentStatus), 1);
        assert_eq!(store.create_calls(EntityKind::Branch), 1);
        assert_eq!(store.create_calls(EntityKind::User), 1);
    }

    #[tokio::test]
    async fn test_provision_reuses_existing_branch_and_user() {
        let store = InMemoryImportStore::new();
        let branch = store
            .create(NewEntity::Branch(NewBranch {
                name: "Amman".to_string(),
                location: "Amman".to_string(),
                manager: "Sara".to_string(),
                email: "amman@example.com".to_string(),
                phone: "065000000".to_string(),
            }))
            .await
            .unwrap();
        let user = store
            .create(NewEntity::User(NewUser {
                name: "Existing Admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Admin,
                branch_id: Some(branch.id),
            }))
            .await
            .unwrap();

        let config = fast_config();
        let baseline = BaselineProvisioner::new(&config)
            .provision(&store)
            .await
            .unwrap();

        assert_eq!(baseline.branch_id, branch.id);
        assert_eq!(baseline.user_id, user.id);
        assert_eq!(store.count(EntityKind::Branch), 1);
        assert_eq!(store.count(EntityKind::User), 1);
        assert_eq!(store.count(EntityKind::ShipmentStatus), 1);
    }
}
