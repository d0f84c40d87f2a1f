// ==========================================
// 货运追踪系统 - 参考数据领域模型
// ==========================================
// 用途: 国家 / 运单状态 / 分支机构 / 用户的创建字段集
// 红线: 同名国家每次导入至多创建一次
// ==========================================

use crate::domain::types::{CountryKind, EntityId, UserRole};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCountry {
    pub name: String,
    pub code: String,
    pub flag: String,
    pub kind: CountryKind,
    pub is_active: bool,
}

impl NewCountry {
    /// 由名称合成国家记录
    ///
    /// # 规则
    /// - code = 名称前两个字符转大写
    /// - flag = 代码为两位 ASCII 字母时使用区域指示符 emoji，否则白旗
    /// - kind = Both（导入无法判断方向）
    pub fn from_name(name: &str) -> Self {
        let code: String = name.chars().take(2).collect::<String>().to_uppercase();
        Self {
            name: name.to_string(),
            flag: flag_for_code(&code),
            code,
            kind: CountryKind::Both,
            is_active: true,
        }
    }
}

/// 两位字母代码 → 国旗 emoji
fn flag_for_code(code: &str) -> String {
    let letters: Vec<char> = code.chars().collect();
    if letters.len() == 2 && letters.iter().all(|c| c.is_ascii_uppercase()) {
        letters
            .iter()
            .filter_map(|c| char::from_u32(0x1F1E6 + (*c as u32 - 'A' as u32)))
            .collect()
    } else {
        "\u{1F3F3}\u{FE0F}".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShipmentStatus {
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBranch {
    pub name: String,
    pub location: String,
    pub manager: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub branch_id: Option<EntityId>,
}
