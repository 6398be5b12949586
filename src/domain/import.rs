// ==========================================
// 客户与抄表导入系统 - 导入管道领域模型
// ==========================================
// 职责: 导入管道中间产物与结果
// 流程: RawRow → ValidatedRow<Fields> → ImportOutcome
// 生命周期: 仅在单次导入调用内，不跨调用保留
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::reading::Reading;
use crate::domain::types::{Gender, ImportType, KindOfMeter};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ==========================================
// RawRow - 原始数据行
// ==========================================
// 用途: 行解析器产出（表头字段名 → 原始字符串），不做任何清洗
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub index: usize, // 数据行序号（0 起，不含表头与空行）
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(index: usize, fields: HashMap<String, String>) -> Self {
        Self { index, fields }
    }

    /// 原始值（字段缺失时为 None）
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// 去除首尾空白后的值（字段缺失视为空串）
    pub fn trimmed(&self, field: &str) -> &str {
        self.get(field).map(str::trim).unwrap_or("")
    }

    /// 字段存在且去空白后非空
    pub fn is_present(&self, field: &str) -> bool {
        !self.trimmed(field).is_empty()
    }

    /// 面向用户的行号（1 起）
    pub fn row_number(&self) -> usize {
        self.index + 1
    }
}

// ==========================================
// NormalizedRecord - 规范化字段记录
// ==========================================
// 实现者: CustomerFields, ReadingFields
pub trait NormalizedRecord {
    type Entity;

    /// 按导入类型表头顺序输出规范化值（用于预览/错误报告）
    fn column_values(&self) -> Vec<String>;

    /// 构造可导入实体；任一类型化字段缺失时返回 None
    fn to_entity(&self, id: Uuid) -> Option<Self::Entity>;
}

// ==========================================
// CustomerFields - 客户行规范化结果
// ==========================================
// 无论校验是否通过都会计算，供预览展示
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFields {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub gender: String, // 已转大写

    // 类型化结果（解析失败为 None）
    #[serde(skip)]
    pub birth_date_value: Option<NaiveDate>,
    #[serde(skip)]
    pub gender_value: Option<Gender>,
}

impl NormalizedRecord for CustomerFields {
    type Entity = Customer;

    fn column_values(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.birth_date.clone(),
            self.gender.clone(),
        ]
    }

    fn to_entity(&self, id: Uuid) -> Option<Customer> {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return None;
        }
        Some(Customer {
            id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birth_date: self.birth_date_value?,
            gender: self.gender_value?,
        })
    }
}

// ==========================================
// ReadingFields - 抄表行规范化结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingFields {
    pub customer_name: String,
    pub date_of_reading: String,
    pub meter_id: String,
    pub kind_of_meter: String, // 已转大写
    pub meter_count: String,
    pub substitute: String, // 已转小写
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>, // 空串视为缺失

    #[serde(skip)]
    pub date_of_reading_value: Option<NaiveDate>,
    #[serde(skip)]
    pub kind_of_meter_value: Option<KindOfMeter>,
    #[serde(skip)]
    pub meter_count_value: Option<f64>,
    #[serde(skip)]
    pub customer: Option<Customer>, // 花名册解析结果（快照）
}

impl ReadingFields {
    /// 估读标记: 仅 "true" / "1" 为真
    pub fn substitute_flag(&self) -> bool {
        self.substitute == "true" || self.substitute == "1"
    }
}

impl NormalizedRecord for ReadingFields {
    type Entity = Reading;

    fn column_values(&self) -> Vec<String> {
        vec![
            self.customer_name.clone(),
            self.date_of_reading.clone(),
            self.meter_id.clone(),
            self.kind_of_meter.clone(),
            self.meter_count.clone(),
            self.substitute.clone(),
            self.comment.clone().unwrap_or_default(),
        ]
    }

    fn to_entity(&self, id: Uuid) -> Option<Reading> {
        if self.meter_id.is_empty() {
            return None;
        }
        Some(Reading {
            id,
            customer: self.customer.clone()?,
            date_of_reading: self.date_of_reading_value?,
            meter_id: self.meter_id.clone(),
            kind_of_meter: self.kind_of_meter_value?,
            meter_count: self.meter_count_value?,
            substitute: self.substitute_flag(),
            comment: self.comment.clone(),
        })
    }
}

// ==========================================
// ValidatedRow - 已校验行
// ==========================================
// 不变式: errors 为空 ⇔ 该行可导入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRow<F> {
    pub raw: RawRow,
    pub fields: F,
    pub errors: Vec<String>,
}

impl<F> ValidatedRow<F> {
    pub fn index(&self) -> usize {
        self.raw.index
    }

    pub fn is_importable(&self) -> bool {
        self.errors.is_empty()
    }

    /// 单行展示用的错误文本
    pub fn error_text(&self) -> String {
        self.errors.join(", ")
    }
}

pub type ValidatedCustomerRow = ValidatedRow<CustomerFields>;
pub type ValidatedReadingRow = ValidatedRow<ReadingFields>;

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub import_type: ImportType,
    pub total: usize,
    pub valid_count: usize,
    pub error_count: usize,
}

// ==========================================
// ImportOutcome - 单次导入结果
// ==========================================
// 保证: valid_rows.len() + rejected_rows.len() == total，两组内均保持源顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome<E, F> {
    pub import_type: ImportType,
    pub total: usize,
    pub valid_rows: Vec<E>,
    pub rejected_rows: Vec<ValidatedRow<F>>,
    pub preview: Vec<ValidatedRow<F>>, // 源顺序前 N 行（含有效行）
}

impl<E, F> ImportOutcome<E, F> {
    pub fn valid_count(&self) -> usize {
        self.valid_rows.len()
    }

    pub fn error_count(&self) -> usize {
        self.total - self.valid_count()
    }

    pub fn summary(&self) -> ImportSummary {
        ImportSummary {
            import_type: self.import_type,
            total: self.total,
            valid_count: self.valid_count(),
            error_count: self.error_count(),
        }
    }

    /// 预览之外还剩多少行
    pub fn remaining_after_preview(&self) -> usize {
        self.total.saturating_sub(self.preview.len())
    }
}

pub type CustomerImportOutcome = ImportOutcome<Customer, CustomerFields>;
pub type ReadingImportOutcome = ImportOutcome<Reading, ReadingFields>;
