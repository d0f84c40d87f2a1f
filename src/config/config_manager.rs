// ==========================================
// 货运追踪系统 - 配置管理器
// ==========================================
// 职责: 从目标库 config_kv 表加载导入配置覆写
// 存储: config_kv 表 (scope_id='global' + key-value)
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::db::open_sqlite_connection;
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = open_sqlite_connection(db_path)
            .with_context(|| format!("无法打开配置数据库: {}", db_path))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在（或 config_kv 表不存在）
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("锁获取失败: {}", e))?;

        let has_table: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='config_kv' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if !has_table {
            return Ok(None);
        }

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 加载导入配置：内置默认值之上叠加 config_kv 覆写
    ///
    /// 说明：格式错误的覆写值记录告警后忽略，保留默认值
    pub fn load_import_config(&self) -> Result<ImportConfig> {
        let mut config = ImportConfig::default();

        self.override_string(config_keys::DEFAULT_STATUS_NAME, &mut config.default_status_name)?;
        self.override_string(config_keys::DEFAULT_STATUS_COLOR, &mut config.default_status_color)?;
        self.override_string(
            config_keys::DEFAULT_STATUS_DESCRIPTION,
            &mut config.default_status_description,
        )?;
        self.override_string(config_keys::DEFAULT_BRANCH_NAME, &mut config.default_branch_name)?;
        self.override_string(
            config_keys::DEFAULT_BRANCH_LOCATION,
            &mut config.default_branch_location,
        )?;
        self.override_string(
            config_keys::DEFAULT_BRANCH_MANAGER,
            &mut config.default_branch_manager,
        )?;
        self.override_string(config_keys::DEFAULT_BRANCH_EMAIL, &mut config.default_branch_email)?;
        self.override_string(config_keys::DEFAULT_BRANCH_PHONE, &mut config.default_branch_phone)?;
        self.override_string(
            config_keys::DEFAULT_OPERATOR_NAME,
            &mut config.default_operator_name,
        )?;
        self.override_string(
            config_keys::DEFAULT_OPERATOR_EMAIL,
            &mut config.default_operator_email,
        )?;
        self.override_string(
            config_keys::DEFAULT_OPERATOR_PASSWORD,
            &mut config.default_operator_password,
        )?;
        self.override_parsed(config_keys::PASSWORD_HASH_COST, &mut config.password_hash_cost)?;
        self.override_parsed(config_keys::DELIVERY_OFFSET_DAYS, &mut config.delivery_offset_days)?;
        self.override_parsed(config_keys::PROGRESS_INTERVAL, &mut config.progress_interval)?;

        if let Some(path) = self.get_config_value(config_keys::FAILURE_REPORT_PATH)? {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                config.failure_report_path = Some(PathBuf::from(trimmed));
            }
        }

        config.validate()?;
        debug!(
            default_status = %config.default_status_name,
            delivery_offset_days = config.delivery_offset_days,
            progress_interval = config.progress_interval,
            "导入配置已加载"
        );
        Ok(config)
    }

    fn override_string(&self, key: &str, target: &mut String) -> Result<()> {
        if let Some(value) = self.get_config_value(key)? {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                warn!(config_key = key, "配置值为空，使用默认值");
            } else {
                *target = trimmed.to_string();
            }
        }
        Ok(())
    }

    fn override_parsed<T: FromStr>(&self, key: &str, target: &mut T) -> Result<()> {
        if let Some(value) = self.get_config_value(key)? {
            match value.trim().parse::<T>() {
                Ok(parsed) => *target = parsed,
                Err(_) => warn!(config_key = key, raw_value = %value, "配置值格式错误，使用默认值"),
            }
        }
        Ok(())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 默认运单状态
    pub const DEFAULT_STATUS_NAME: &str = "import/default_status_name";
    pub const DEFAULT_STATUS_COLOR: &str = "import/default_status_color";
    pub const DEFAULT_STATUS_DESCRIPTION: &str = "import/default_status_description";

    // 默认分支机构
    pub const DEFAULT_BRANCH_NAME: &str = "import/default_branch_name";
    pub const DEFAULT_BRANCH_LOCATION: &str = "import/default_branch_location";
    pub const DEFAULT_BRANCH_MANAGER: &str = "import/default_branch_manager";
    pub const DEFAULT_BRANCH_EMAIL: &str = "import/default_branch_email";
    pub const DEFAULT_BRANCH_PHONE: &str = "import/default_branch_phone";

    // 默认操作员
    pub const DEFAULT_OPERATOR_NAME: &str = "import/default_operator_name";
    pub const DEFAULT_OPERATOR_EMAIL: &str = "import/default_operator_email";
    pub const DEFAULT_OPERATOR_PASSWORD: &str = "import/default_operator_password";
    pub const PASSWORD_HASH_COST: &str = "import/password_hash_cost";

    // 导入行为
    pub const DELIVERY_OFFSET_DAYS: &str = "import/delivery_offset_days";
    pub const PROGRESS_INTERVAL: &str = "import/progress_interval";
    pub const FAILURE_REPORT_PATH: &str = "import/failure_report_path";
}
