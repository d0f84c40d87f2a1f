// ==========================================
// 货运追踪系统 - 字段映射器实现
// ==========================================
// 阶段 2: 源列 → ImportRecord 标准字段 + 清洗
// 列名匹配: 忽略大小写，支持别名
// ==========================================

use crate::domain::ImportRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::RawRow;
use crate::importer::shipment_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};

/// 标准列及其别名
pub mod columns {
    pub const SHIPMENT_ID: &[&str] = &["Shipment ID", "ID", "shipment_id"];
    pub const SHIPMENT_TITLE: &[&str] = &[
        "Shipment Title",
        "Title",
        "Shipment Number",
        "Tracking Number",
        "shipment_title",
    ];
    pub const SENDER_NAME: &[&str] = &["Shipper Name", "Sender Name"];
    pub const SENDER_PHONE: &[&str] = &["Shipper Phone", "Shipper Phone Number", "Sender Phone"];
    pub const SENDER_ADDRESS: &[&str] = &["Shipper Address", "Sender Address"];
    pub const SENDER_EMAIL: &[&str] = &["Shipper Email", "Sender Email"];
    pub const RECIPIENT_NAME: &[&str] = &["Receiver Name", "Recipient Name"];
    pub const RECIPIENT_PHONE: &[&str] =
        &["Receiver Phone", "Receiver Phone Number", "Recipient Phone"];
    pub const RECIPIENT_ADDRESS: &[&str] = &["Receiver Address", "Recipient Address"];
    pub const RECIPIENT_EMAIL: &[&str] = &["Receiver Email", "Recipient Email"];
    pub const ORIGIN: &[&str] = &["Origin"];
    pub const DESTINATION: &[&str] = &["Destination"];
    pub const PICKUP_DATE: &[&str] = &["Pickup Date"];
    pub const EXPECTED_DELIVERY_DATE: &[&str] = &["Expected Delivery Date"];
    pub const STATUS: &[&str] = &["Status"];
    pub const WEIGHT: &[&str] = &["Weight"];
    pub const BOX_COUNT: &[&str] = &["Packages", "Package Count", "Qty"];
    pub const CONTENT: &[&str] = &["Product", "Content"];
    pub const PAYMENT_MODE: &[&str] = &["Payment Mode", "Payment Method"];
    pub const COMMENTS: &[&str] = &["Comments", "Remarks"];
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_import_record(&self, row: &RawRow) -> ImportRecord {
        let c = &self.cleaner;

        ImportRecord {
            // 标识
            shipment_id: c.normalize_null(get_value(row, columns::SHIPMENT_ID)),
            shipment_title: c.normalize_null(get_value(row, columns::SHIPMENT_TITLE)),

            // 发件人
            sender_name: c.clean_text(get_value(row, columns::SENDER_NAME)),
            sender_phone: c.clean_text(get_value(row, columns::SENDER_PHONE)),
            sender_address: c.clean_text(get_value(row, columns::SENDER_ADDRESS)),
            sender_email: c.normalize_null(get_value(row, columns::SENDER_EMAIL)),

            // 收件人
            recipient_name: c.clean_text(get_value(row, columns::RECIPIENT_NAME)),
            recipient_phone: c.clean_text(get_value(row, columns::RECIPIENT_PHONE)),
            recipient_address: c.clean_text(get_value(row, columns::RECIPIENT_ADDRESS)),
            recipient_email: c.normalize_null(get_value(row, columns::RECIPIENT_EMAIL)),

            // 路线
            origin: c.clean_text(get_value(row, columns::ORIGIN)),
            destination: c.clean_text(get_value(row, columns::DESTINATION)),

            // 日期
            pickup_date: c.parse_date(get_value(row, columns::PICKUP_DATE)),
            expected_delivery_date: c.parse_date(get_value(row, columns::EXPECTED_DELIVERY_DATE)),

            // 货物
            weight: c.parse_weight(get_value(row, columns::WEIGHT)),
            box_count: c.parse_box_count(get_value(row, columns::BOX_COUNT)),
            content: c.clean_text(get_value(row, columns::CONTENT)),

            // 付款与状态
            payment_mode_text: c.normalize_null(get_value(row, columns::PAYMENT_MODE)),
            payment_method: c.classify_payment(get_value(row, columns::PAYMENT_MODE)),
            status_text: c.normalize_null(get_value(row, columns::STATUS)),
            comments: c.normalize_null(get_value(row, columns::COMMENTS)),

            row_number: row.row_number,
        }
    }
}

/// 按别名顺序取第一个非空值（列名忽略大小写）
fn get_value<'a>(row: &'a RawRow, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        row.fields
            .iter()
            .find(|(header, value)| {
                header.trim().eq_ignore_ascii_case(alias) && !value.trim().is_empty()
            })
            .map(|(_, value)| value.as_str())
    })
}
