// ==========================================
// 客户与抄表导入系统 - 领域类型定义
// ==========================================
// 依据: 客户/抄表数据接口约定 (Gender / KindOfMeter 枚举)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入类型 (Import Type)
// ==========================================
// 每种导入类型对应一套固定的表头与校验规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    Customers,
    Readings,
}

impl ImportType {
    /// 该导入类型约定的 CSV 表头（按列顺序）
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            ImportType::Customers => &["firstName", "lastName", "birthDate", "gender"],
            ImportType::Readings => &[
                "customerName",
                "dateOfReading",
                "meterId",
                "kindOfMeter",
                "meterCount",
                "substitute",
                "comment",
            ],
        }
    }

    /// 该导入类型约定的列分隔符
    pub fn delimiter(&self) -> u8 {
        b','
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportType::Customers => write!(f, "customers"),
            ImportType::Readings => write!(f, "readings"),
        }
    }
}

impl FromStr for ImportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customers" => Ok(ImportType::Customers),
            "readings" => Ok(ImportType::Readings),
            other => Err(format!("未知导入类型: {}", other)),
        }
    }
}

// ==========================================
// 性别 (Gender)
// ==========================================
// 序列化格式: 单字母大写代码 (与数据库 CHECK 约束一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    D, // 多元
    M, // 男
    U, // 未知
    W, // 女
}

impl Gender {
    pub fn code(&self) -> &'static str {
        match self {
            Gender::D => "D",
            Gender::M => "M",
            Gender::U => "U",
            Gender::W => "W",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// 大小写不敏感，首尾空白忽略
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "D" => Ok(Gender::D),
            "M" => Ok(Gender::M),
            "U" => Ok(Gender::U),
            "W" => Ok(Gender::W),
            other => Err(format!("无效性别代码: {}", other)),
        }
    }
}

// ==========================================
// 表计类型 (Kind of Meter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindOfMeter {
    #[serde(rename = "HEIZUNG")]
    Heizung, // 供暖
    #[serde(rename = "STROM")]
    Strom, // 电
    #[serde(rename = "WASSER")]
    Wasser, // 水
    #[serde(rename = "UNBEKANNT")]
    Unbekannt, // 未知
}

impl KindOfMeter {
    pub fn code(&self) -> &'static str {
        match self {
            KindOfMeter::Heizung => "HEIZUNG",
            KindOfMeter::Strom => "STROM",
            KindOfMeter::Wasser => "WASSER",
            KindOfMeter::Unbekannt => "UNBEKANNT",
        }
    }
}

impl fmt::Display for KindOfMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for KindOfMeter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HEIZUNG" => Ok(KindOfMeter::Heizung),
            "STROM" => Ok(KindOfMeter::Strom),
            "WASSER" => Ok(KindOfMeter::Wasser),
            "UNBEKANNT" => Ok(KindOfMeter::Unbekannt),
            other => Err(format!("无效表计类型: {}", other)),
        }
    }
}

// ==========================================
// 重名客户处理策略 (Duplicate Name Policy)
// ==========================================
// 抄表行通过 "名 姓" 自由文本关联客户，花名册存在重名时需显式选择策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateNamePolicy {
    /// 多个客户同名时拒绝该行
    Reject,
    /// 取花名册中的第一个匹配
    FirstMatch,
}

impl Default for DuplicateNamePolicy {
    fn default() -> Self {
        DuplicateNamePolicy::Reject
    }
}

impl fmt::Display for DuplicateNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateNamePolicy::Reject => write!(f, "REJECT"),
            DuplicateNamePolicy::FirstMatch => write!(f, "FIRST_MATCH"),
        }
    }
}

impl FromStr for DuplicateNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REJECT" => Ok(DuplicateNamePolicy::Reject),
            "FIRST_MATCH" => Ok(DuplicateNamePolicy::FirstMatch),
            other => Err(format!("无效重名策略: {}", other)),
        }
    }
}
