// ==========================================
// 客户与抄表导入系统 - 字段规则集
// ==========================================
// 职责: 每种导入类型一组固定、有序的字段规则
// 形式: 规则 = (字段, 检查类型, 违规消息)，对只读行快照逐条独立求值
// ==========================================

use crate::domain::{Customer, DuplicateNamePolicy, ImportType, RawRow};
use crate::importer::customer_resolver::{resolve_customer, CustomerMatch};
use crate::importer::data_cleaner::DataCleaner;

// ==========================================
// 违规消息（对外契约，文本不可改动）
// ==========================================
pub mod messages {
    pub const FIRST_NAME_REQUIRED: &str = "First name is required";
    pub const LAST_NAME_REQUIRED: &str = "Last name is required";
    pub const BIRTH_DATE_REQUIRED: &str = "Birth date is required";
    pub const GENDER_REQUIRED: &str = "Gender is required";
    pub const INVALID_DATE: &str = "Invalid date format (use YYYY-MM-DD)";
    pub const INVALID_GENDER: &str = "Gender must be M, W, D, or U";

    pub const CUSTOMER_NAME_REQUIRED: &str = "Customer name is required";
    pub const DATE_OF_READING_REQUIRED: &str = "Date of reading is required";
    pub const METER_ID_REQUIRED: &str = "Meter ID is required";
    pub const KIND_OF_METER_REQUIRED: &str = "Kind of meter is required";
    pub const METER_COUNT_REQUIRED: &str = "Meter count is required";
    pub const SUBSTITUTE_REQUIRED: &str = "Substitute field is required";
    pub const INVALID_KIND_OF_METER: &str =
        "Kind of meter must be STROM, WASSER, HEIZUNG, or UNBEKANNT";
    pub const INVALID_METER_COUNT: &str = "Meter count must be a positive number";
    pub const CUSTOMER_NOT_FOUND: &str = "Customer not found (check spelling and case)";
    pub const CUSTOMER_AMBIGUOUS: &str = "Customer name is ambiguous (multiple customers match)";
}

pub const GENDER_CODES: &[&str] = &["M", "W", "D", "U"];
pub const KIND_OF_METER_CODES: &[&str] = &["STROM", "WASSER", "HEIZUNG", "UNBEKANNT"];

// ==========================================
// RuleKind - 检查类型
// ==========================================
// 除 Required / Present 外，其余检查仅在字段存在（去空白非空）时执行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// 去空白后非空
    Required,
    /// 原始值非缺失、非空串（纯空白视为已填）
    Present,
    /// 严格 YYYY-MM-DD 且日历有效
    IsoDate,
    /// 转大写后属于给定代码集
    OneOf(&'static [&'static str]),
    /// 非负有限浮点数
    NonNegativeNumber,
    /// 在花名册中解析到唯一客户
    RosterMatch,
}

// ==========================================
// RuleContext - 规则求值上下文
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub roster: &'a [Customer],
    pub duplicate_name_policy: DuplicateNamePolicy,
}

impl<'a> RuleContext<'a> {
    /// 客户导入不需要花名册
    pub fn without_roster() -> Self {
        Self {
            roster: &[],
            duplicate_name_policy: DuplicateNamePolicy::default(),
        }
    }
}

// ==========================================
// FieldRule - 单条字段规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: RuleKind,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, kind: RuleKind, message: &'static str) -> Self {
        Self {
            field,
            kind,
            message,
        }
    }

    pub const fn required(field: &'static str, message: &'static str) -> Self {
        Self::new(field, RuleKind::Required, message)
    }

    pub const fn present(field: &'static str, message: &'static str) -> Self {
        Self::new(field, RuleKind::Present, message)
    }

    /// 对单行求值，违规时返回一条消息
    pub fn check(&self, row: &RawRow, ctx: &RuleContext<'_>) -> Option<&'static str> {
        let value = row.trimmed(self.field);
        let cleaner = DataCleaner;

        let ok = match self.kind {
            RuleKind::Required => !value.is_empty(),
            RuleKind::Present => row.get(self.field).is_some_and(|v| !v.is_empty()),
            _ if value.is_empty() => true,
            RuleKind::IsoDate => cleaner.parse_iso_date(value).is_some(),
            RuleKind::OneOf(codes) => {
                let upper = value.to_uppercase();
                codes.iter().any(|code| *code == upper)
            }
            RuleKind::NonNegativeNumber => cleaner.parse_non_negative(value).is_some(),
            RuleKind::RosterMatch => {
                match resolve_customer(value, ctx.roster, ctx.duplicate_name_policy) {
                    CustomerMatch::Found(_) => true,
                    CustomerMatch::NotFound => false,
                    CustomerMatch::Ambiguous(_) => return Some(messages::CUSTOMER_AMBIGUOUS),
                }
            }
        };

        if ok {
            None
        } else {
            Some(self.message)
        }
    }
}

// ==========================================
// 规则表
// ==========================================

pub const CUSTOMER_RULES: &[FieldRule] = &[
    FieldRule::required("firstName", messages::FIRST_NAME_REQUIRED),
    FieldRule::required("lastName", messages::LAST_NAME_REQUIRED),
    FieldRule::required("birthDate", messages::BIRTH_DATE_REQUIRED),
    FieldRule::required("gender", messages::GENDER_REQUIRED),
    FieldRule::new("birthDate", RuleKind::IsoDate, messages::INVALID_DATE),
    FieldRule::new("gender", RuleKind::OneOf(GENDER_CODES), messages::INVALID_GENDER),
];

pub const READING_RULES: &[FieldRule] = &[
    FieldRule::required("customerName", messages::CUSTOMER_NAME_REQUIRED),
    FieldRule::required("dateOfReading", messages::DATE_OF_READING_REQUIRED),
    FieldRule::required("meterId", messages::METER_ID_REQUIRED),
    FieldRule::required("kindOfMeter", messages::KIND_OF_METER_REQUIRED),
    FieldRule::required("meterCount", messages::METER_COUNT_REQUIRED),
    FieldRule::present("substitute", messages::SUBSTITUTE_REQUIRED),
    FieldRule::new("dateOfReading", RuleKind::IsoDate, messages::INVALID_DATE),
    FieldRule::new(
        "kindOfMeter",
        RuleKind::OneOf(KIND_OF_METER_CODES),
        messages::INVALID_KIND_OF_METER,
    ),
    FieldRule::new(
        "meterCount",
        RuleKind::NonNegativeNumber,
        messages::INVALID_METER_COUNT,
    ),
    FieldRule::new("customerName", RuleKind::RosterMatch, messages::CUSTOMER_NOT_FOUND),
];

// ==========================================
// FieldRuleSet - 导入类型的规则集
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct FieldRuleSet {
    import_type: ImportType,
    rules: &'static [FieldRule],
}

impl FieldRuleSet {
    pub fn for_import_type(import_type: ImportType) -> Self {
        let rules = match import_type {
            ImportType::Customers => CUSTOMER_RULES,
            ImportType::Readings => READING_RULES,
        };
        Self { import_type, rules }
    }

    pub fn import_type(&self) -> ImportType {
        self.import_type
    }

    pub fn rules(&self) -> &'static [FieldRule] {
        self.rules
    }

    /// 依序求值全部规则，收集所有违规消息（不短路）
    pub fn evaluate(&self, row: &RawRow, ctx: &RuleContext<'_>) -> Vec<String> {
        self.rules
            .iter()
            .filter_map(|rule| rule.check(row, ctx))
            .map(str::to_string)
            .collect()
    }
}
