// ==========================================
// 货运追踪系统 - 导入持久化端口 SQLite 实现
// ==========================================
// 职责: 使用 rusqlite 实现 find_first / create
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 所有值使用参数化；表名/字段名仅来自白名单
// ==========================================

use crate::db::{
    configure_sqlite_connection, init_schema, open_sqlite_connection, read_schema_version,
    CURRENT_SCHEMA_VERSION,
};
use crate::domain::EntityKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_store::{
    is_filterable, EntityFilter, EntityRef, ImportStore, NewEntity,
};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// ==========================================
// SqliteImportStore
// ==========================================
pub struct SqliteImportStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteImportStore {
    /// 打开数据库并确保表结构存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        check_schema_version(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA 与建表，均幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
            check_schema_version(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 共享连接（供配置读取等复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn insert(conn: &Connection, entity: &NewEntity) -> RepositoryResult<i64> {
        let now = Utc::now();
        match entity {
            NewEntity::Country(c) => {
                conn.execute(
                    "INSERT INTO country (name, code, flag, kind, is_active, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![c.name, c.code, c.flag, c.kind.as_str(), c.is_active, now],
                )?;
            }
            NewEntity::ShipmentStatus(s) => {
                conn.execute(
                    "INSERT INTO shipment_status (name, color, description, sort_order, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![s.name, s.color, s.description, s.sort_order, now],
                )?;
            }
            NewEntity::Branch(b) => {
                conn.execute(
                    "INSERT INTO branch (name, location, manager, email, phone, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![b.name, b.location, b.manager, b.email, b.phone, now],
                )?;
            }
            NewEntity::User(u) => {
                conn.execute(
                    "INSERT INTO app_user (name, email, password_hash, role, branch_id, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![u.name, u.email, u.password_hash, u.role.as_str(), u.branch_id, now],
                )?;
            }
            NewEntity::Shipment(s) => {
                conn.execute(
                    r#"
                    INSERT INTO shipment (
                        shipment_number, branch_id, created_by, status_id,
                        origin_country_id, destination_country_id,
                        sender_name, sender_phone, sender_address, sender_email,
                        recipient_name, recipient_phone, recipient_address, recipient_email,
                        weight, box_count, content, payment_method, payment_status,
                        cost, paid_amount, receiving_date, expected_delivery_date,
                        notes, created_at
                    ) VALUES (
                        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                        ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25
                    )
                    "#,
                    params![
                        s.shipment_number,
                        s.branch_id,
                        s.created_by,
                        s.status_id,
                        s.origin_country_id,
                        s.destination_country_id,
                        s.sender_name,
                        s.sender_phone,
                        s.sender_address,
                        s.sender_email,
                        s.recipient_name,
                        s.recipient_phone,
                        s.recipient_address,
                        s.recipient_email,
                        s.weight,
                        s.box_count,
                        s.content,
                        s.payment_method.as_str(),
                        s.payment_status.as_str(),
                        s.cost,
                        s.paid_amount,
                        s.receiving_date,
                        s.expected_delivery_date,
                        s.notes,
                        now,
                    ],
                )?;
            }
        }
        Ok(conn.last_insert_rowid())
    }
}

/// 数据库版本高于代码期望时只告警，不做迁移
fn check_schema_version(conn: &Connection) -> RepositoryResult<()> {
    if let Some(version) = read_schema_version(conn)? {
        if version > CURRENT_SCHEMA_VERSION {
            warn!(
                db_version = version,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema 版本高于当前程序"
            );
        }
    }
    Ok(())
}

#[async_trait]
impl ImportStore for SqliteImportStore {
    async fn find_first(
        &self,
        kind: EntityKind,
        filter: &EntityFilter,
    ) -> RepositoryResult<Option<EntityRef>> {
        let conn = self.lock()?;
        let table = kind.table_name();

        let id: Option<i64> = match filter {
            EntityFilter::Any => conn
                .query_row(
                    &format!("SELECT id FROM {} ORDER BY id LIMIT 1", table),
                    [],
                    |row| row.get(0),
                )
                .optional()?,
            EntityFilter::Eq { field, value } => {
                if !is_filterable(kind, field) {
                    return Err(RepositoryError::UnsupportedFilterField {
                        entity: kind.to_string(),
                        field: field.to_string(),
                    });
                }
                conn.query_row(
                    &format!(
                        "SELECT id FROM {} WHERE {} = ?1 ORDER BY id LIMIT 1",
                        table, field
                    ),
                    params![value],
                    |row| row.get(0),
                )
                .optional()?
            }
        };

        Ok(id.map(|id| EntityRef { kind, id }))
    }

    async fn create(&self, entity: NewEntity) -> RepositoryResult<EntityRef> {
        let conn = self.lock()?;
        let kind = entity.kind();
        let id = Self::insert(&conn, &entity)?;
        debug!(entity = %kind, id = id, "实体已创建");
        Ok(EntityRef { kind, id })
    }
}
