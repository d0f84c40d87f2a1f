// ==========================================
// 货运追踪系统 - 导入报告模型
// ==========================================
// 用途: 单次导入的汇总结果（计数 + 失败明细）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// RecordFailure - 单条记录失败
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub row_number: usize,
    pub shipment_number: Option<String>,
    pub message: String,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub source_file: Option<String>,
    pub started_at: DateTime<Utc>,

    // ===== 运单计数 =====
    pub total_rows: usize,
    pub succeeded: usize,
    pub skipped: usize, // 已存在运单号（非失败）
    pub failed: usize,

    // ===== 参考数据 =====
    pub countries_created: usize,
    pub countries_reused: usize,
    pub reference_failures: usize,

    // ===== 数据质量提示 =====
    pub date_fallbacks: usize,
    pub duplicate_titles_in_file: usize,

    pub failures: Vec<RecordFailure>,
    pub elapsed: Duration,
}

impl ImportReport {
    /// 已处理记录数（成功 + 跳过 + 失败）
    pub fn processed(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// 人类可读的汇总行
    pub fn summary_line(&self) -> String {
        format!(
            "导入完成: 处理 {} 条, 成功 {} 条, 跳过(已存在) {} 条, 失败 {} 条, 耗时 {} ms",
            self.processed(),
            self.succeeded,
            self.skipped,
            self.failed,
            self.elapsed.as_millis()
        )
    }
}
