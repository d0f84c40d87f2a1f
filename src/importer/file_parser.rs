// ==========================================
// 货运追踪系统 - 平面文件解析器实现
// ==========================================
// 阶段 1: 文件读取与分词
// 规则:
// - 按行切分，丢弃空白行；首个非空行为表头
// - 引号切换"引号内"状态，引号本身不写入字段
// - 引号外的逗号结束当前字段；引号内逗号原样保留
// - 未闭合引号不报错，保持状态直到行尾
// - 每个字段 TRIM
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::shipment_importer_trait::FileParser;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const QUOTE: char = '"';
const DELIMITER: char = ',';
const BOM: char = '\u{feff}';

// ==========================================
// RawRow - 原始行记录（列名 → 值）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 数据行号（从 1 开始，不含表头与空行）
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }
}

// ==========================================
// FlatTable - 分词结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>, // 文件顺序
}

/// 按引号切换规则拆分一行
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    // 最后一个字段无条件写出
    fields.push(current.trim().to_string());
    fields
}

/// 将整段文本分词为表头 + 行记录
///
/// # 返回
/// - Some(FlatTable): 至少存在表头
/// - None: 全部为空行
pub fn tokenize(content: &str) -> Option<FlatTable> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let headers: Vec<String> = split_fields(lines.next()?);

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        let row_number = idx + 1;
        let values = split_fields(line);

        if values.len() > headers.len() {
            debug!(
                row_number = row_number,
                cells = values.len(),
                headers = headers.len(),
                "行单元格多于表头，多余部分忽略"
            );
        }

        let mut fields = HashMap::with_capacity(headers.len());
        for (col_idx, header) in headers.iter().enumerate() {
            let value = values.get(col_idx).cloned().unwrap_or_default();
            fields.entry(header.clone()).or_insert(value);
        }

        rows.push(RawRow { row_number, fields });
    }

    Some(FlatTable { headers, rows })
}

// ==========================================
// FlatFileParser 实现
// ==========================================
pub struct FlatFileParser;

impl FileParser for FlatFileParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<FlatTable> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let bytes = fs::read(file_path)?;
        let content = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file_path.display(), "文件不是合法 UTF-8，按有损方式解码");
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        self.parse_text(&content)
            .ok_or_else(|| ImportError::EmptyFile(file_path.display().to_string()))
    }

    fn parse_text(&self, content: &str) -> Option<FlatTable> {
        let table = tokenize(content)?;
        debug!(
            headers = table.headers.len(),
            rows = table.rows.len(),
            "文件分词完成"
        );
        Some(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_quoted_field_keeps_comma() {
        let fields = split_fields(r#""Shipment, Part A",Ahmad,0790000000"#);
        assert_eq!(fields, vec!["Shipment, Part A", "Ahmad", "0790000000"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = split_fields("  a ,b  ,  c");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unmatched_quote_runs_to_end_of_line() {
        let fields = split_fields(r#"a,"b,c,d"#);
        assert_eq!(fields, vec!["a", "b,c,d"]);
    }

    #[test]
    fn test_mid_field_quotes_toggle_and_are_dropped() {
        let fields = split_fields(r#"ab"c,d"e,f"#);
        assert_eq!(fields, vec!["abc,de", "f"]);
    }

    #[test]
    fn test_unmatched_quote_does_not_span_lines() {
        let table = tokenize("A,B\n\"x,y\n1,2\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].fields.get("A").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_trailing_comma_yields_empty_last_field() {
        let fields = split_fields("a,b,");
        assert_eq!(fields, vec!["a", "b", ""]);
    }

    #[test]
    fn test_tokenize_skips_blank_lines_and_strips_header_quotes() {
        let content = "\n\"Shipment Title\", \"Origin\"\r\n\r\nSH-1,Jordan\n   \nSH-2,Iraq\n";
        let table = tokenize(content).unwrap();

        assert_eq!(table.headers, vec!["Shipment Title", "Origin"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("Shipment Title"), Some("SH-1"));
        assert_eq!(table.rows[1].get("Origin"), Some("Iraq"));
        assert_eq!(table.rows[1].row_number, 2);
    }

    #[test]
    fn test_short_row_fills_missing_columns() {
        let table = tokenize("A,B,C\n1,2\n").unwrap();
        assert_eq!(table.rows[0].get("C"), Some(""));
    }

    #[test]
    fn test_bom_removed_from_header() {
        let table = tokenize("\u{feff}Shipment Title,Origin\nSH-1,Jordan\n").unwrap();
        assert_eq!(table.headers[0], "Shipment Title");
    }

    #[test]
    fn test_tokenize_empty_content() {
        assert!(tokenize("\n  \n").is_none());
    }

    #[test]
    fn test_parse_file_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Shipment Title,Origin,Destination").unwrap();
        writeln!(temp_file, "\"SH, 1\",Jordan,Iraq").unwrap();

        let table = FlatFileParser.parse_file(temp_file.path()).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Shipment Title"), Some("SH, 1"));
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = FlatFileParser.parse_file(Path::new("non_existent_shipments.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_file_blank() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file).unwrap();

        let result = FlatFileParser.parse_file(temp_file.path());
        assert!(matches!(result, Err(ImportError::EmptyFile(_))));
    }
}
