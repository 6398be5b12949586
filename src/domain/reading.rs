// ==========================================
// 客户与抄表导入系统 - 抄表领域模型
// ==========================================
// 对齐: readings 表 (id, customer_id, comment, date_of_reading,
//       kind_of_meter, meter_count, meter_id, substitute)
// ==========================================

use crate::domain::customer::Customer;
use crate::domain::types::KindOfMeter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Reading - 抄表记录
// ==========================================
// 红线: customer 为导入时刻的客户快照（按值嵌入），不是实时引用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: Uuid,
    pub customer: Customer,
    pub date_of_reading: NaiveDate,
    pub meter_id: String,
    pub kind_of_meter: KindOfMeter,
    pub meter_count: f64,
    pub substitute: bool, // 估读标记（非实际读数）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
