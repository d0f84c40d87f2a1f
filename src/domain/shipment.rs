// ==========================================
// 货运追踪系统 - 运单领域模型
// ==========================================
// 用途: ImportRecord 为导入管道中间产物（仅在单次导入内存活）
//       NewShipment 为写入持久化端口的运单字段集
// ==========================================

use crate::domain::types::{EntityId, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 未提供文本字段时的显式占位值
pub const NOT_SPECIFIED: &str = "Not specified";

// ==========================================
// DateField - 日期字段解析结果
// ==========================================
// 区分"未提供"与"无法解析"，两者下游均回退，但后者需告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateField {
    Parsed(DateTime<Utc>),
    Missing,
    Unparseable(String),
}

impl DateField {
    /// 解析成功的值
    pub fn value(&self) -> Option<DateTime<Utc>> {
        match self {
            DateField::Parsed(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, DateField::Unparseable(_))
    }
}

// ==========================================
// ImportRecord - 导入中间结构体
// ==========================================
// 生命周期: 仅在导入流程内，不直接落库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    // ===== 标识 =====
    pub shipment_id: Option<String>,     // 源系统 ID
    pub shipment_title: Option<String>,  // 源系统标题（运单号）

    // ===== 发件人 =====
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub sender_email: Option<String>,

    // ===== 收件人 =====
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_email: Option<String>,

    // ===== 路线 =====
    pub origin: String,
    pub destination: String,

    // ===== 日期 =====
    pub pickup_date: DateField,
    pub expected_delivery_date: DateField,

    // ===== 货物 =====
    pub weight: f64,   // >= 0
    pub box_count: i32, // >= 1
    pub content: String,

    // ===== 付款与状态 =====
    pub payment_mode_text: Option<String>,
    pub payment_method: PaymentMethod,
    pub status_text: Option<String>,
    pub comments: Option<String>,

    // 元信息
    pub row_number: usize, // 数据行号（从 1 开始，不含表头）
}

impl ImportRecord {
    /// 运单号: 标题优先，其次源 ID
    pub fn shipment_number(&self) -> Option<&str> {
        self.shipment_title
            .as_deref()
            .or(self.shipment_id.as_deref())
    }
}

// ==========================================
// NewShipment - 待创建运单
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShipment {
    pub shipment_number: String,

    // ===== 外键 =====
    pub branch_id: EntityId,
    pub created_by: EntityId,
    pub status_id: EntityId,
    pub origin_country_id: EntityId,
    pub destination_country_id: EntityId,

    // ===== 发件人/收件人 =====
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_address: String,
    pub sender_email: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_email: Option<String>,

    // ===== 货物 =====
    pub weight: f64,
    pub box_count: i32,
    pub content: String,

    // ===== 财务（导入一律清零）=====
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub cost: f64,
    pub paid_amount: f64,

    // ===== 日期 =====
    pub receiving_date: DateTime<Utc>,
    pub expected_delivery_date: DateTime<Utc>,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_field_value() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(DateField::Parsed(dt).value(), Some(dt));
        assert_eq!(DateField::Missing.value(), None);
        assert!(DateField::Unparseable("32/13/2024".to_string()).is_unparseable());
        assert!(!DateField::Missing.is_unparseable());
    }
}
