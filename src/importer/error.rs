// ==========================================
// 货运追踪系统 - 导入模块错误类型
// ==========================================
// 分层:
// - 致命错误: 文件不可读 / 存储不可用 / 基础实体无法建立 → 终止整批
// - 单条错误: 记录级失败，计数后继续
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（致命）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("文件无表头（全部为空行）: {0}")]
    EmptyFile(String),

    // ===== 存储相关错误 =====
    #[error("存储不可用: {0}")]
    StoreUnavailable(String),

    #[error("基础实体准备失败 ({entity}): {source}")]
    Baseline {
        entity: String,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 记录级错误 =====
    #[error("无法解析国家 (行 {row}): {name}，且对账表为空")]
    UnresolvedCountry { row: usize, name: String },

    // ===== 报告输出 =====
    #[error("失败明细写入失败: {0}")]
    CsvWriteError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为终止整批的致命错误
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::FileReadError(_)
                | ImportError::EmptyFile(_)
                | ImportError::StoreUnavailable(_)
                | ImportError::Baseline { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
