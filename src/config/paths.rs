// ==========================================
// 货运追踪系统 - 路径解析
// ==========================================
// 优先级: 命令行参数 → 环境变量 → 默认位置
// ==========================================

use std::path::PathBuf;

/// 输入文件路径环境变量
pub const ENV_INPUT_FILE: &str = "SHIPMENT_IMPORT_FILE";

/// 数据库路径环境变量
pub const ENV_DB_PATH: &str = "SHIPMENT_IMPORT_DB_PATH";

/// 失败明细 CSV 路径环境变量
pub const ENV_FAILURE_REPORT: &str = "SHIPMENT_IMPORT_FAILURE_REPORT";

/// 默认输入文件
pub const DEFAULT_INPUT_FILE: &str = "./shipments.csv";

/// 读取非空环境变量
fn env_path(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 输入文件路径
pub fn resolve_input_path(arg: Option<&str>) -> PathBuf {
    arg.map(str::to_string)
        .or_else(|| env_path(ENV_INPUT_FILE))
        .unwrap_or_else(|| DEFAULT_INPUT_FILE.to_string())
        .into()
}

/// 数据库路径
pub fn resolve_db_path(arg: Option<&str>) -> String {
    if let Some(path) = arg {
        return path.to_string();
    }
    if let Some(path) = env_path(ENV_DB_PATH) {
        return path;
    }
    get_default_db_path()
}

/// 失败明细 CSV 路径（仅环境变量；config_kv 中的值由 ConfigManager 读取）
pub fn failure_report_override() -> Option<PathBuf> {
    env_path(ENV_FAILURE_REPORT).map(PathBuf::from)
}

/// 默认数据库路径: 用户数据目录，取不到时回退到当前目录
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./shipments.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("shipment-import");
        // 目录创建失败时沿用当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("shipments.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_argument_wins() {
        assert_eq!(resolve_input_path(Some("legacy.csv")), PathBuf::from("legacy.csv"));
        assert_eq!(resolve_db_path(Some("/tmp/x.db")), "/tmp/x.db");
    }

    #[test]
    fn test_default_db_path_file_name() {
        assert!(get_default_db_path().ends_with("shipments.db"));
    }
}
