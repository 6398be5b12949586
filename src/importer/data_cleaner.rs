// ==========================================
// 客户与抄表导入系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / LOWER / NULL 标准化 + 字符串到类型的转换
// ==========================================

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// 日期字面格式: 严格 YYYY-MM-DD
static ISO_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("ISO 日期正则非法"));

pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM，可选 UPPER）
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// TRIM + LOWER（布尔类标记字段）
    pub fn clean_flag(&self, value: &str) -> String {
        value.trim().to_lowercase()
    }

    /// 标准化 NULL 值（缺失/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析日期（YYYY-MM-DD → NaiveDate）
    ///
    /// 字面格式与日历有效性同时满足才返回 Some；2024-02-30 之类返回 None
    pub fn parse_iso_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if !ISO_DATE_PATTERN.is_match(value) {
            return None;
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    }

    /// 解析非负有限浮点数（NaN / inf / 负数 → None；-0 归一为 0）
    pub fn parse_non_negative(&self, value: &str) -> Option<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(f64::abs)
    }
}
