// ==========================================
// 货运追踪系统 - 导入配置
// ==========================================
// 职责: 导入管道全部可调参数及其默认值
// 覆写顺序: 内置默认值 → config_kv 表 → 调用方显式设置
// ==========================================

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认预计送达偏移（天）
pub const DEFAULT_DELIVERY_OFFSET_DAYS: i64 = 7;

/// 默认进度提示间隔（成功条数）
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    // ===== 默认运单状态 =====
    pub default_status_name: String,
    pub default_status_color: String,
    pub default_status_description: String,

    // ===== 默认分支机构 =====
    pub default_branch_name: String,
    pub default_branch_location: String,
    pub default_branch_manager: String,
    pub default_branch_email: String,
    pub default_branch_phone: String,

    // ===== 默认操作员 =====
    pub default_operator_name: String,
    pub default_operator_email: String,
    pub default_operator_password: String,
    pub password_hash_cost: u32,

    // ===== 导入行为 =====
    pub delivery_offset_days: i64,
    pub progress_interval: usize,
    pub failure_report_path: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_status_name: "Under Review".to_string(),
            default_status_color: "#f59e0b".to_string(),
            default_status_description: "Imported shipment awaiting review".to_string(),
            default_branch_name: "Main Branch".to_string(),
            default_branch_location: "Head Office".to_string(),
            default_branch_manager: "Branch Manager".to_string(),
            default_branch_email: "main-branch@shipments.local".to_string(),
            default_branch_phone: "0000000000".to_string(),
            default_operator_name: "Import Operator".to_string(),
            default_operator_email: "import@shipments.local".to_string(),
            default_operator_password: "ChangeMe-Import-2024".to_string(),
            password_hash_cost: bcrypt::DEFAULT_COST,
            delivery_offset_days: DEFAULT_DELIVERY_OFFSET_DAYS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            failure_report_path: None,
        }
    }
}

impl ImportConfig {
    /// 校验配置取值
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            bail!("progress_interval 必须 >= 1");
        }
        if self.delivery_offset_days < 0 {
            bail!("delivery_offset_days 必须 >= 0，实际 {}", self.delivery_offset_days);
        }
        if !(4..=31).contains(&self.password_hash_cost) {
            bail!("password_hash_cost 必须在 [4, 31] 范围内，实际 {}", self.password_hash_cost);
        }
        for (key, value) in [
            ("default_status_name", &self.default_status_name),
            ("default_branch_name", &self.default_branch_name),
            ("default_operator_email", &self.default_operator_email),
        ] {
            if value.trim().is_empty() {
                bail!("{} 不能为空", key);
            }
        }
        Ok(())
    }
}
