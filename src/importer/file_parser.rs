// ==========================================
// 客户与抄表导入系统 - 行解析器实现
// ==========================================
// 职责: 分隔文本 → 有序 RawRow 序列（首个非空行为表头）
// 红线: 不含任何领域规则，不做值清洗
// ==========================================

use crate::domain::{ImportType, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_trait::FileParser;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// ParsedCsv - 解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedCsv {
    /// 返回 expected 中表头缺失的列名
    pub fn missing_headers<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .filter(|name| !self.headers.iter().any(|h| h == *name))
            .copied()
            .collect()
    }
}

// ==========================================
// CsvParser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按导入类型约定的分隔符创建
    pub fn for_import_type(import_type: ImportType) -> Self {
        Self {
            delimiter: import_type.delimiter(),
        }
    }

    /// 解析内存中的文本
    pub fn parse_str(&self, text: &str) -> ImportResult<ParsedCsv> {
        self.parse_reader(text.as_bytes())
    }

    /// 解析任意输入流
    pub fn parse_reader<R: Read>(&self, input: R) -> ImportResult<ParsedCsv> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false) // 表头取首个非空行，自行处理
            .flexible(true) // 允许行长度不一致
            .from_reader(input);

        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;

            // 空行不占用行号
            if is_blank(&record) {
                continue;
            }

            let names = match &headers {
                Some(names) => names,
                None => {
                    let names = read_headers(&record);
                    debug!(headers = ?names, "读取表头");
                    headers = Some(names);
                    continue;
                }
            };

            if record.len() > names.len() {
                debug!(
                    row = rows.len(),
                    extra = record.len() - names.len(),
                    "行字段数多于表头，多余字段忽略"
                );
            }

            // 缺失的尾部字段补空串
            let fields: HashMap<String, String> = names
                .iter()
                .enumerate()
                .map(|(col_idx, name)| {
                    (name.clone(), record.get(col_idx).unwrap_or("").to_string())
                })
                .collect();

            rows.push(RawRow::new(rows.len(), fields));
        }

        if headers.is_none() {
            warn!("输入无表头行，返回空结果");
        }

        Ok(ParsedCsv {
            headers: headers.unwrap_or_default(),
            rows,
        })
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedCsv> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }
}

/// 空行或仅含空白的行
fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

/// 表头去空白，并去掉首列可能携带的 UTF-8 BOM
fn read_headers(record: &StringRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect()
}
