// ==========================================
// 货运追踪系统 - 运单导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::{DateField, ImportRecord, ImportReport, PaymentMethod};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{FlatTable, RawRow};
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ShipmentImporter Trait
// ==========================================
// 用途: 运单导入主接口
// 实现者: ShipmentImporterImpl
#[async_trait]
pub trait ShipmentImporter: Send + Sync {
    /// 从平面文件导入历史运单
    ///
    /// # 导入流程（6个阶段，严格顺序执行）
    /// 1. 文件读取与分词
    /// 2. 字段映射与清洗
    /// 3. 基础实体准备（状态/分支/操作员）
    /// 4. 国家对账（两遍扫描）
    /// 5. 逐条创建运单（幂等 + 失败隔离）
    /// 6. 汇总报告
    ///
    /// # 返回
    /// - Ok(ImportReport): 整批完成（无论单条失败多少）
    /// - Err: 致命错误（文件不可读、存储不可用、基础实体失败）
    async fn import_from_file(&self, file_path: &Path) -> ImportResult<ImportReport>;

    /// 从已读入的文本导入（便于测试与嵌入）
    async fn import_from_text(
        &self,
        content: &str,
        source_name: Option<&str>,
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: FlatFileParser
pub trait FileParser: Send + Sync {
    /// 读取文件并分词为表头 + 行记录
    ///
    /// # 返回
    /// - Ok(FlatTable): 表头与行记录（文件顺序）
    /// - Err: 文件不存在 / 不可读 / 无表头
    fn parse_file(&self, file_path: &Path) -> ImportResult<FlatTable>;

    /// 对已读入文本分词
    fn parse_text(&self, content: &str) -> Option<FlatTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 2）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为 ImportRecord（缺失字段一律取默认值，不报错）
    fn map_to_import_record(&self, row: &RawRow) -> ImportRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字段清洗接口（阶段 2）
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 文本字段：TRIM，空值 → "Not specified"
    fn clean_text(&self, value: Option<&str>) -> String;

    /// 可空字段：TRIM，空值 → None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 重量：小数逗号 → 小数点，解析失败 → 0.0，负数截为 0
    fn parse_weight(&self, value: Option<&str>) -> f64;

    /// 件数：解析失败 → 1，小于 1 截为 1
    fn parse_box_count(&self, value: Option<&str>) -> i32;

    /// 付款方式分类（无法识别 → 货到付款）
    fn classify_payment(&self, value: Option<&str>) -> PaymentMethod;

    /// 日期解析（通用格式 → 年-月-日三段 → Missing/Unparseable）
    fn parse_date(&self, value: Option<&str>) -> DateField;
}
