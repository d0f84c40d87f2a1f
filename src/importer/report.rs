// ==========================================
// 货运追踪系统 - 导入报告汇总
// ==========================================
// 职责: 单次导入的计数器 + 进度提示 + 最终汇总
// 输出: 进度与汇总写 stdout，日志写 stderr
// ==========================================

use crate::domain::{ImportReport, RecordFailure};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::reconciler::CountryMap;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub struct ImportReporter {
    batch_id: String,
    source_file: Option<String>,
    started_at: DateTime<Utc>,
    start: Instant,
    progress_interval: usize,

    total_rows: usize,
    succeeded: usize,
    skipped: usize,
    failed: usize,

    countries_created: usize,
    countries_reused: usize,
    reference_failures: usize,

    date_fallbacks: usize,
    duplicate_titles_in_file: usize,

    failures: Vec<RecordFailure>,
}

impl ImportReporter {
    pub fn new(batch_id: String, source_file: Option<String>, progress_interval: usize) -> Self {
        Self {
            batch_id,
            source_file,
            started_at: Utc::now(),
            start: Instant::now(),
            progress_interval: progress_interval.max(1),
            total_rows: 0,
            succeeded: 0,
            skipped: 0,
            failed: 0,
            countries_created: 0,
            countries_reused: 0,
            reference_failures: 0,
            date_fallbacks: 0,
            duplicate_titles_in_file: 0,
            failures: Vec::new(),
        }
    }

    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
    }

    pub fn record_countries(&mut self, map: &CountryMap) {
        self.countries_created = map.created;
        self.countries_reused = map.reused;
        self.reference_failures = map.failures;
    }

    pub fn record_duplicate_titles(&mut self, count: usize) {
        self.duplicate_titles_in_file = count;
    }

    pub fn record_date_fallback(&mut self) {
        self.date_fallbacks += 1;
    }

    /// 成功一条；每满 progress_interval 条输出一次进度
    ///
    /// # 返回
    /// - true: 本次输出了进度提示
    pub fn record_success(&mut self) -> bool {
        self.succeeded += 1;
        if self.succeeded % self.progress_interval != 0 {
            return false;
        }
        println!("已导入 {} 条运单...", self.succeeded);
        true
    }

    /// 运单号已存在（通知，不计失败）
    pub fn record_skipped(&mut self, row_number: usize, shipment_number: &str) {
        self.skipped += 1;
        info!(row_number = row_number, shipment_number = %shipment_number, "运单已存在，跳过");
    }

    pub fn record_failure(
        &mut self,
        row_number: usize,
        shipment_number: Option<&str>,
        error: &ImportError,
    ) {
        self.failed += 1;
        self.failures.push(RecordFailure {
            row_number,
            shipment_number: shipment_number.map(str::to_string),
            message: error.to_string(),
        });
    }

    pub fn finish(self) -> ImportReport {
        ImportReport {
            batch_id: self.batch_id,
            source_file: self.source_file,
            started_at: self.started_at,
            total_rows: self.total_rows,
            succeeded: self.succeeded,
            skipped: self.skipped,
            failed: self.failed,
            countries_created: self.countries_created,
            countries_reused: self.countries_reused,
            reference_failures: self.reference_failures,
            date_fallbacks: self.date_fallbacks,
            duplicate_titles_in_file: self.duplicate_titles_in_file,
            failures: self.failures,
            elapsed: self.start.elapsed(),
        }
    }
}

/// 失败明细导出为 CSV（row_number,shipment_number,message）
pub fn write_failure_csv(report: &ImportReport, path: &Path) -> ImportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for failure in &report.failures {
        writer.serialize(failure)?;
    }
    writer
        .flush()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    if report.failures.is_empty() {
        warn!(path = %path.display(), "无失败记录，失败明细文件为空");
    } else {
        info!(path = %path.display(), rows = report.failures.len(), "失败明细已导出");
    }
    Ok(())
}
