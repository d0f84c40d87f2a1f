// ==========================================
// 货运追踪系统 - 冲突处理器实现
// ==========================================
// 职责: 检测同一文件内重复出现的运单号
// 说明: 重复行仍按顺序处理，由幂等检查跳过后出现者
// ==========================================

use crate::domain::ImportRecord;
use std::collections::HashMap;
use tracing::warn;

/// 文件内重复运单号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTitle {
    pub row_number: usize,
    pub first_row: usize,
    pub shipment_number: String,
}

pub struct ConflictHandler;

impl ConflictHandler {
    /// 检测同一文件内重复运单号
    ///
    /// # 返回
    /// - Vec<DuplicateTitle>: 重复记录列表（不包括第一次出现）
    pub fn detect_duplicates(&self, records: &[ImportRecord]) -> Vec<DuplicateTitle> {
        let mut first_occurrence: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for record in records {
            let Some(number) = record.shipment_number() else {
                continue;
            };

            match first_occurrence.get(number) {
                Some(&first_row) => {
                    warn!(
                        row_number = record.row_number,
                        first_row = first_row,
                        shipment_number = %number,
                        "文件内运单号重复，后出现者将被跳过"
                    );
                    duplicates.push(DuplicateTitle {
                        row_number: record.row_number,
                        first_row,
                        shipment_number: number.to_string(),
                    });
                }
                None => {
                    first_occurrence.insert(number, record.row_number);
                }
            }
        }

        duplicates
    }
}
