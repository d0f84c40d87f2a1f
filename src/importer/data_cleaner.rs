// ==========================================
// 货运追踪系统 - 数据清洗器实现
// ==========================================
// 阶段 2: TRIM / NULL 标准化 / 数值与日期容错解析 / 付款方式分类
// 红线: 清洗不报错，一律回退到显式默认值
// ==========================================

use crate::domain::{DateField, PaymentMethod, NOT_SPECIFIED};
use crate::importer::shipment_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 货到付款关键词（英文 / 阿拉伯文）
const CASH_TOKENS: &[&str] = &["cash", "كاش", "نقد"];

/// 刷卡关键词（英文 / 阿拉伯文）
const CARD_TOKENS: &[&str] = &["card", "credit", "visa", "بطاقة", "فيزا"];

/// 带时间的通用格式
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// 仅日期的通用格式
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: Option<&str>) -> String {
        self.normalize_null(value)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_weight(&self, value: Option<&str>) -> f64 {
        value
            .map(|v| v.trim().replace(',', "."))
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|w| w.is_finite())
            .map(|w| w.max(0.0))
            .unwrap_or(0.0)
    }

    /// 取前导整数（"3.0" → 3，"2 boxes" → 2），无数字或 < 1 时为 1
    fn parse_box_count(&self, value: Option<&str>) -> i32 {
        value
            .and_then(leading_integer)
            .map(|n| n.max(1))
            .unwrap_or(1)
    }

    fn classify_payment(&self, value: Option<&str>) -> PaymentMethod {
        // 无法识别 → 货到付款（兜底，非错误）
        match_payment_tokens(value.unwrap_or_default()).unwrap_or(PaymentMethod::CashOnDelivery)
    }

    fn parse_date(&self, value: Option<&str>) -> DateField {
        let text = match self.normalize_null(value) {
            Some(text) => text,
            None => return DateField::Missing,
        };

        parse_general_date(&text)
            .or_else(|| parse_ymd_triple(&text))
            .map(DateField::Parsed)
            .unwrap_or(DateField::Unparseable(text))
    }
}

/// 通用日期解析（RFC 3339 / RFC 2822 / 常见格式）
fn parse_general_date(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// 兜底解析：以连字符分隔的 年-月-日 三段（容忍补零差异与日后缀文本）
fn parse_ymd_triple(text: &str) -> Option<DateTime<Utc>> {
    let mut parts = text.splitn(3, '-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let day_part = parts.next()?.trim();
    let day_digits: String = day_part.chars().take_while(|c| c.is_ascii_digit()).collect();
    let day = day_digits.parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 按关键词识别付款方式；现金优先于刷卡，未命中返回 None
pub fn match_payment_tokens(value: &str) -> Option<PaymentMethod> {
    let text = value.trim().to_lowercase();
    if CASH_TOKENS.iter().any(|token| text.contains(token)) {
        Some(PaymentMethod::CashOnDelivery)
    } else if CARD_TOKENS.iter().any(|token| text.contains(token)) {
        Some(PaymentMethod::CreditCard)
    } else {
        None
    }
}

/// 可选符号 + 连续数字；其余部分忽略
fn leading_integer(value: &str) -> Option<i32> {
    let text = value.trim();
    let digits_start = usize::from(text.starts_with(['+', '-']));
    let digits_len = text[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..digits_start + digits_len].parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_clean_text_defaults() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text(Some("  Ahmad  ")), "Ahmad");
        assert_eq!(cleaner.clean_text(Some("   ")), NOT_SPECIFIED);
        assert_eq!(cleaner.clean_text(None), NOT_SPECIFIED);
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("")), None);
        assert_eq!(cleaner.normalize_null(Some("  x@y.com ")), Some("x@y.com".to_string()));
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_weight() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_weight(Some("2,5")), 2.5);
        assert_eq!(cleaner.parse_weight(Some(" 10.25 ")), 10.25);
        assert_eq!(cleaner.parse_weight(Some("abc")), 0.0);
        assert_eq!(cleaner.parse_weight(Some("")), 0.0);
        assert_eq!(cleaner.parse_weight(Some("-3")), 0.0);
        assert_eq!(cleaner.parse_weight(None), 0.0);
    }

    #[test]
    fn test_parse_box_count() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_box_count(Some("3")), 3);
        assert_eq!(cleaner.parse_box_count(Some("")), 1);
        assert_eq!(cleaner.parse_box_count(Some("two")), 1);
        assert_eq!(cleaner.parse_box_count(Some("0")), 1);
        assert_eq!(cleaner.parse_box_count(None), 1);
    }

    #[test]
    fn test_match_payment_tokens() {
        assert_eq!(match_payment_tokens(" CASH "), Some(PaymentMethod::CashOnDelivery));
        assert_eq!(match_payment_tokens("فيزا"), Some(PaymentMethod::CreditCard));
        assert_eq!(match_payment_tokens("bank transfer"), None);
        assert_eq!(match_payment_tokens(""), None);
    }

    #[test]
    fn test_parse_box_count_leading_integer() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_box_count(Some("3.0")), 3);
        assert_eq!(cleaner.parse_box_count(Some("2 boxes")), 2);
        assert_eq!(cleaner.parse_box_count(Some(" 12pcs")), 12);
        assert_eq!(cleaner.parse_box_count(Some("-4")), 1);
        assert_eq!(cleaner.parse_box_count(Some("x3")), 1);
        assert_eq!(cleaner.parse_box_count(Some("99999999999")), 1);
    }

    #[test]
    fn test_classify_payment() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.classify_payment(Some("كاش")), PaymentMethod::CashOnDelivery);
        assert_eq!(
            cleaner.classify_payment(Some("Cash on delivery")),
            PaymentMethod::CashOnDelivery
        );
        assert_eq!(cleaner.classify_payment(Some("Card payment")), PaymentMethod::CreditCard);
        assert_eq!(cleaner.classify_payment(Some("بطاقة ائتمان")), PaymentMethod::CreditCard);
        assert_eq!(cleaner.classify_payment(Some("")), PaymentMethod::CashOnDelivery);
        assert_eq!(cleaner.classify_payment(Some("bank transfer")), PaymentMethod::CashOnDelivery);
        assert_eq!(cleaner.classify_payment(None), PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_parse_date_general_formats() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date(Some("2024-03-15")), DateField::Parsed(ymd(2024, 3, 15)));
        assert_eq!(cleaner.parse_date(Some("03/15/2024")), DateField::Parsed(ymd(2024, 3, 15)));
        assert_eq!(
            cleaner.parse_date(Some("March 15, 2024")),
            DateField::Parsed(ymd(2024, 3, 15))
        );
        assert_eq!(
            cleaner.parse_date(Some("2024-03-15T10:30:00Z")),
            DateField::Parsed(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_date_triple_fallback() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.parse_date(Some("2024 - 3 - 7 (approx)")),
            DateField::Parsed(ymd(2024, 3, 7))
        );
    }

    #[test]
    fn test_parse_date_missing_vs_unparseable() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date(Some("  ")), DateField::Missing);
        assert_eq!(cleaner.parse_date(None), DateField::Missing);
        assert_eq!(
            cleaner.parse_date(Some("next tuesday")),
            DateField::Unparseable("next tuesday".to_string())
        );
        assert_eq!(
            cleaner.parse_date(Some("2024-13-45")),
            DateField::Unparseable("2024-13-45".to_string())
        );
    }
}
