// ==========================================
// 货运追踪系统 - 历史运单导入命令行入口
// ==========================================
// 用法: shipment-import [input.csv] [db_path] [--json]
// 退出码: 整批完成 → 0（无论单条失败多少）；致命错误 → 非 0
// 输出: 进度与汇总写 stdout，日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use shipment_import::config::paths::{
    failure_report_override, resolve_db_path, resolve_input_path,
};
use shipment_import::config::ConfigManager;
use shipment_import::importer::{ImportError, ShipmentImporter, ShipmentImporterImpl};
use shipment_import::repository::SqliteImportStore;
use shipment_import::{logging, APP_NAME, VERSION};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut json_output = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json_output = true;
        } else {
            positional.push(arg);
        }
    }

    let input_path = resolve_input_path(positional.first().map(String::as_str));
    let db_path = resolve_db_path(positional.get(1).map(String::as_str));

    info!("{} v{}", APP_NAME, VERSION);
    info!(input = %input_path.display(), db_path = %db_path, "导入参数");

    // 存储不可达属于致命错误
    let store = SqliteImportStore::new(&db_path).map_err(|e| {
        let err = ImportError::StoreUnavailable(format!("{}: {}", db_path, e));
        error!(error = %err, "无法打开目标数据库");
        err
    })?;

    let mut config = ConfigManager::from_connection(store.connection())
        .load_import_config()
        .context("加载导入配置失败")?;
    if let Some(path) = failure_report_override() {
        config.failure_report_path = Some(path);
    }

    let importer = ShipmentImporterImpl::with_defaults(store, config);
    let report = importer.import_from_file(&input_path).await.map_err(|e| {
        error!(error = %e, fatal = e.is_fatal(), "导入终止");
        e
    })?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("序列化导入报告失败")?
        );
    } else {
        println!("{}", report.summary_line());
        if report.duplicate_titles_in_file > 0 {
            println!("文件内重复运单号: {} 条", report.duplicate_titles_in_file);
        }
        if report.date_fallbacks > 0 {
            println!("无法解析的日期（已回退）: {} 个", report.date_fallbacks);
        }
        if report.reference_failures > 0 {
            println!("国家对账失败: {} 个", report.reference_failures);
        }
    }

    Ok(())
}
