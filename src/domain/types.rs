// ==========================================
// 货运追踪系统 - 领域类型定义
// ==========================================
// 职责: 导入管道使用的枚举与标识类型
// 序列化格式: snake_case (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 持久化实体主键（SQLite rowid）
pub type EntityId = i64;

// ==========================================
// 实体种类 (Entity Kind)
// ==========================================
// 用途: 持久化端口 find_first / create 的实体选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Country,        // 国家
    ShipmentStatus, // 运单状态
    Branch,         // 分支机构
    User,           // 用户
    Shipment,       // 运单
}

impl EntityKind {
    /// 对应的数据表名
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Country => "country",
            EntityKind::ShipmentStatus => "shipment_status",
            EntityKind::Branch => "branch",
            EntityKind::User => "app_user",
            EntityKind::Shipment => "shipment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Country => write!(f, "Country"),
            EntityKind::ShipmentStatus => write!(f, "ShipmentStatus"),
            EntityKind::Branch => write!(f, "Branch"),
            EntityKind::User => write!(f, "User"),
            EntityKind::Shipment => write!(f, "Shipment"),
        }
    }
}

// ==========================================
// 国家适用方向 (Country Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountryKind {
    Origin,      // 仅始发
    Destination, // 仅目的
    Both,        // 双向（导入默认）
}

impl CountryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryKind::Origin => "origin",
            CountryKind::Destination => "destination",
            CountryKind::Both => "both",
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Manager,
    Employee,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Manager => "manager",
            UserRole::Employee => "employee",
        }
    }
}

// ==========================================
// 付款方式 (Payment Method)
// ==========================================
// 红线: 无法识别的付款文本一律归为货到付款
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery, // 货到付款
    CreditCard,     // 信用卡
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
            PaymentMethod::CreditCard => "credit_card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 付款状态 (Payment Status)
// ==========================================
// 导入不携带结算状态，统一为 Pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending, // 待付款
    Partial, // 部分付款
    Paid,    // 已付款
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
