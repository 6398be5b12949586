// ==========================================
// 客户与抄表导入系统 - 客户领域模型
// ==========================================
// 对齐: customers 表 (id, first_name, last_name, birth_date, gender)
// ==========================================

use crate::domain::types::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Customer - 客户
// ==========================================
// 用途: 客户导入的产出实体；抄表导入时作为只读花名册
// 序列化: camelCase 字段名，birthDate 为 YYYY-MM-DD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl Customer {
    /// "名 姓" 形式的全名（抄表行 customerName 的匹配口径）
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}
