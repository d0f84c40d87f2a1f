// ==========================================
// 货运追踪系统 - 运单导入器实现
// ==========================================
// 职责: 整合导入流程，从平面文件到持久化端口
// 流程: 分词 → 映射/清洗 → 重复检测 → 基础实体 → 国家对账 → 逐条创建 → 汇总
// 红线: 严格顺序执行，每次存储调用 await 完成后才发起下一次
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{DateField, EntityKind, ImportRecord, ImportReport, NewShipment, PaymentStatus};
use crate::importer::baseline::{Baseline, BaselineProvisioner};
use crate::importer::conflict_handler::ConflictHandler;
use crate::importer::data_cleaner::match_payment_tokens;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{FlatFileParser, FlatTable};
use crate::importer::reconciler::{CountryMap, CountryReconciler};
use crate::importer::report::{write_failure_csv, ImportReporter};
use crate::importer::shipment_importer_trait::{FieldMapper, FileParser, ShipmentImporter};
use crate::repository::{fields, EntityFilter, ImportStore, NewEntity};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 旧系统状态文本写入备注时的前缀
const LEGACY_STATUS_PREFIX: &str = "Legacy status: ";

/// 无法识别的付款方式原文写入备注时的前缀
const LEGACY_PAYMENT_PREFIX: &str = "Legacy payment mode: ";

/// 单条记录处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
enum RecordOutcome {
    Created(String),
    Skipped(String),
}

// ==========================================
// ShipmentImporterImpl - 运单导入器实现
// ==========================================
pub struct ShipmentImporterImpl<S>
where
    S: ImportStore,
{
    // 持久化端口
    store: S,

    // 导入配置
    config: ImportConfig,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    conflict_handler: ConflictHandler,
    reconciler: CountryReconciler,
}

impl<S> ShipmentImporterImpl<S>
where
    S: ImportStore,
{
    /// 创建新的 ShipmentImporter 实例
    ///
    /// # 参数
    /// - store: 持久化端口
    /// - config: 导入配置
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(
        store: S,
        config: ImportConfig,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            store,
            config,
            file_parser,
            field_mapper,
            conflict_handler: ConflictHandler,
            reconciler: CountryReconciler,
        }
    }

    /// 使用默认解析器与映射器
    pub fn with_defaults(store: S, config: ImportConfig) -> Self {
        Self::new(
            store,
            config,
            Box::new(FlatFileParser),
            Box::new(FieldMapperImpl::default()),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }
}

#[async_trait]
impl<S> ShipmentImporter for ShipmentImporterImpl<S>
where
    S: ImportStore,
{
    async fn import_from_file(&self, file_path: &Path) -> ImportResult<ImportReport> {
        info!(file_path = %file_path.display(), "开始导入历史运单");

        let table = self.file_parser.parse_file(file_path).map_err(|e| {
            error!(file_path = %file_path.display(), error = %e, "文件解析失败");
            e
        })?;

        self.run_pipeline(table, Some(file_path.display().to_string()))
            .await
    }

    async fn import_from_text(
        &self,
        content: &str,
        source_name: Option<&str>,
    ) -> ImportResult<ImportReport> {
        let table = self.file_parser.parse_text(content).ok_or_else(|| {
            ImportError::EmptyFile(source_name.unwrap_or("<inline>").to_string())
        })?;

        self.run_pipeline(table, source_name.map(str::to_string))
            .await
    }
}

// 辅助方法
impl<S> ShipmentImporterImpl<S>
where
    S: ImportStore,
{
    #[instrument(skip(self, table), fields(batch_id))]
    async fn run_pipeline(
        &self,
        table: FlatTable,
        source_file: Option<String>,
    ) -> ImportResult<ImportReport> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let mut reporter = ImportReporter::new(
            batch_id.clone(),
            source_file,
            self.config.progress_interval,
        );

        // === 步骤 1: 字段映射与清洗 ===
        debug!("步骤 1: 字段映射与清洗");
        let records: Vec<ImportRecord> = table
            .rows
            .iter()
            .map(|row| self.field_mapper.map_to_import_record(row))
            .collect();
        reporter.set_total_rows(records.len());
        info!(total_rows = records.len(), "字段映射完成");

        // === 步骤 2: 文件内重复检测 ===
        let duplicates = self.conflict_handler.detect_duplicates(&records);
        reporter.record_duplicate_titles(duplicates.len());

        // === 步骤 3: 基础实体（失败即终止）===
        debug!("步骤 3: 基础实体准备");
        let baseline = BaselineProvisioner::new(&self.config)
            .provision(&self.store)
            .await
            .map_err(|e| {
                error!(error = %e, "基础实体准备失败，终止导入");
                e
            })?;

        // === 步骤 4: 国家对账（两遍扫描）===
        debug!("步骤 4: 国家对账");
        let countries = self.reconciler.reconcile(&self.store, &records).await;
        reporter.record_countries(&countries);

        // === 步骤 5: 逐条创建运单 ===
        debug!("步骤 5: 逐条创建运单");
        for (row_index, record) in records.iter().enumerate() {
            match self
                .import_record(record, row_index, &baseline, &countries, &mut reporter)
                .await
            {
                Ok(RecordOutcome::Created(number)) => {
                    debug!(row_number = record.row_number, shipment_number = %number, "运单已创建");
                    reporter.record_success();
                }
                Ok(RecordOutcome::Skipped(number)) => {
                    reporter.record_skipped(record.row_number, &number);
                }
                Err(e) => {
                    error!(
                        row_number = record.row_number,
                        shipment_number = record.shipment_number().unwrap_or("-"),
                        error = %e,
                        "运单导入失败，继续处理后续记录"
                    );
                    reporter.record_failure(record.row_number, record.shipment_number(), &e);
                }
            }
        }

        // === 步骤 6: 汇总 ===
        let report = reporter.finish();
        if let Some(path) = &self.config.failure_report_path {
            if let Err(e) = write_failure_csv(&report, path) {
                error!(path = %path.display(), error = %e, "失败明细导出失败");
            }
        }

        info!(
            batch_id = %report.batch_id,
            total = report.total_rows,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "运单导入完成"
        );
        Ok(report)
    }

    /// 处理单条记录（幂等检查 → 外键解析 → 日期 → 组装 → 创建）
    async fn import_record(
        &self,
        record: &ImportRecord,
        row_index: usize,
        baseline: &Baseline,
        countries: &CountryMap,
        reporter: &mut ImportReporter,
    ) -> ImportResult<RecordOutcome> {
        // 幂等检查
        if let Some(number) = record.shipment_number() {
            let filter = EntityFilter::eq(fields::SHIPMENT_NUMBER, number);
            if self
                .store
                .find_first(EntityKind::Shipment, &filter)
                .await?
                .is_some()
            {
                return Ok(RecordOutcome::Skipped(number.to_string()));
            }
        }

        // 外键解析（映射表只读）
        let origin_country_id =
            countries.resolve_country_with_fallback(&record.origin, record.row_number)?;
        let destination_country_id =
            countries.resolve_country_with_fallback(&record.destination, record.row_number)?;

        // 日期
        let (receiving_date, expected_delivery_date) = self.resolve_dates(record, reporter);

        let shipment_number = record
            .shipment_number()
            .map(str::to_string)
            .unwrap_or_else(|| placeholder_number(row_index));

        let shipment = NewShipment {
            shipment_number: shipment_number.clone(),
            branch_id: baseline.branch_id,
            created_by: baseline.user_id,
            status_id: baseline.status_id,
            origin_country_id,
            destination_country_id,
            sender_name: record.sender_name.clone(),
            sender_phone: record.sender_phone.clone(),
            sender_address: record.sender_address.clone(),
            sender_email: record.sender_email.clone(),
            recipient_name: record.recipient_name.clone(),
            recipient_phone: record.recipient_phone.clone(),
            recipient_address: record.recipient_address.clone(),
            recipient_email: record.recipient_email.clone(),
            weight: record.weight,
            box_count: record.box_count,
            content: record.content.clone(),
            payment_method: record.payment_method,
            payment_status: PaymentStatus::Pending,
            cost: 0.0,
            paid_amount: 0.0,
            receiving_date,
            expected_delivery_date,
            notes: build_notes(record),
        };

        self.store
            .create(NewEntity::Shipment(Box::new(shipment)))
            .await?;
        Ok(RecordOutcome::Created(shipment_number))
    }

    /// 收件日期 = 取件日期或当前时间；预计送达 = 源数据或收件日期 + 偏移天数
    fn resolve_dates(
        &self,
        record: &ImportRecord,
        reporter: &mut ImportReporter,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        for (column, field) in [
            ("pickup_date", &record.pickup_date),
            ("expected_delivery_date", &record.expected_delivery_date),
        ] {
            if let DateField::Unparseable(raw) = field {
                warn!(
                    row_number = record.row_number,
                    column = column,
                    raw = %raw,
                    "日期无法解析，使用回退值"
                );
                reporter.record_date_fallback();
            }
        }

        let receiving = record.pickup_date.value().unwrap_or_else(Utc::now);
        let expected = record
            .expected_delivery_date
            .value()
            .unwrap_or_else(|| receiving + Duration::days(self.config.delivery_offset_days));

        if expected < receiving {
            debug!(
                row_number = record.row_number,
                receiving = %receiving,
                expected = %expected,
                "预计送达早于收件日期，按源数据保留"
            );
        }

        (receiving, expected)
    }
}

/// 无运单号时的占位编号
fn placeholder_number(row_index: usize) -> String {
    format!("IMP-{}-{}", Utc::now().timestamp_millis(), row_index)
}

/// 备注 = 源备注 + 旧系统状态
fn build_notes(record: &ImportRecord) -> Option<String> {
    let mut lines = Vec::new();
    if let Some(comments) = &record.comments {
        lines.push(comments.clone());
    }
    if let Some(status) = &record.status_text {
        lines.push(format!("{}{}", LEGACY_STATUS_PREFIX, status));
    }
    // 已识别的付款方式由枚举承载，只保留兜底分类的原文
    if let Some(mode) = &record.payment_mode_text {
        if match_payment_tokens(mode).is_none() {
            lines.push(format!("{}{}", LEGACY_PAYMENT_PREFIX, mode));
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
