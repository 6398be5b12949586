// ==========================================
// 客户与抄表导入系统 - 行校验/转换器实现
// ==========================================
// 职责: 规则求值 + 规范化 + 类型转换 + 客户名称解析
// 红线: 不修改输入行与花名册；规范化值不依赖校验结果
// ==========================================

use crate::domain::{
    Customer, CustomerFields, DuplicateNamePolicy, ImportType, RawRow, ReadingFields,
    ValidatedRow,
};
use crate::importer::customer_resolver::resolve_customer;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_rules::{FieldRuleSet, RuleContext};
use crate::importer::import_trait::RowValidator;

// ==========================================
// CustomerRowValidator - 客户行校验器
// ==========================================
pub struct CustomerRowValidator {
    rules: FieldRuleSet,
    cleaner: DataCleaner,
}

impl Default for CustomerRowValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomerRowValidator {
    pub fn new() -> Self {
        Self {
            rules: FieldRuleSet::for_import_type(ImportType::Customers),
            cleaner: DataCleaner,
        }
    }

    /// 规范化: 全部 TRIM，gender 转大写
    fn normalize(&self, row: &RawRow) -> CustomerFields {
        let birth_date = self.cleaner.clean_text(row.trimmed("birthDate"), false);
        let gender = self.cleaner.clean_text(row.trimmed("gender"), true);

        CustomerFields {
            first_name: self.cleaner.clean_text(row.trimmed("firstName"), false),
            last_name: self.cleaner.clean_text(row.trimmed("lastName"), false),
            birth_date_value: self.cleaner.parse_iso_date(&birth_date),
            gender_value: gender.parse().ok(),
            birth_date,
            gender,
        }
    }
}

impl RowValidator for CustomerRowValidator {
    type Fields = CustomerFields;

    fn import_type(&self) -> ImportType {
        ImportType::Customers
    }

    fn validate(&self, row: &RawRow) -> ValidatedRow<CustomerFields> {
        let errors = self.rules.evaluate(row, &RuleContext::without_roster());

        ValidatedRow {
            raw: row.clone(),
            fields: self.normalize(row),
            errors,
        }
    }
}

// ==========================================
// ReadingRowValidator - 抄表行校验器
// ==========================================
// 花名册为只读旁路输入，借用于整个校验过程
pub struct ReadingRowValidator<'a> {
    rules: FieldRuleSet,
    cleaner: DataCleaner,
    context: RuleContext<'a>,
}

impl<'a> ReadingRowValidator<'a> {
    pub fn new(roster: &'a [Customer], duplicate_name_policy: DuplicateNamePolicy) -> Self {
        Self {
            rules: FieldRuleSet::for_import_type(ImportType::Readings),
            cleaner: DataCleaner,
            context: RuleContext {
                roster,
                duplicate_name_policy,
            },
        }
    }

    /// 规范化: 全部 TRIM，kindOfMeter 转大写，substitute 转小写，comment 空串 → None
    fn normalize(&self, row: &RawRow) -> ReadingFields {
        let date_of_reading = self.cleaner.clean_text(row.trimmed("dateOfReading"), false);
        let kind_of_meter = self.cleaner.clean_text(row.trimmed("kindOfMeter"), true);
        let meter_count = self.cleaner.clean_text(row.trimmed("meterCount"), false);
        let customer_name = self.cleaner.clean_text(row.trimmed("customerName"), false);

        // 快照: 克隆花名册条目，结果不引用花名册
        let customer = resolve_customer(
            &customer_name,
            self.context.roster,
            self.context.duplicate_name_policy,
        )
        .customer()
        .cloned();

        ReadingFields {
            meter_id: self.cleaner.clean_text(row.trimmed("meterId"), false),
            substitute: self.cleaner.clean_flag(row.trimmed("substitute")),
            comment: self.cleaner.normalize_null(row.get("comment")),
            date_of_reading_value: self.cleaner.parse_iso_date(&date_of_reading),
            kind_of_meter_value: kind_of_meter.parse().ok(),
            meter_count_value: self.cleaner.parse_non_negative(&meter_count),
            customer,
            customer_name,
            date_of_reading,
            kind_of_meter,
            meter_count,
        }
    }
}

impl RowValidator for ReadingRowValidator<'_> {
    type Fields = ReadingFields;

    fn import_type(&self) -> ImportType {
        ImportType::Readings
    }

    fn validate(&self, row: &RawRow) -> ValidatedRow<ReadingFields> {
        let errors = self.rules.evaluate(row, &self.context);

        ValidatedRow {
            raw: row.clone(),
            fields: self.normalize(row),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, KindOfMeter, NormalizedRecord};
    use crate::importer::field_rules::messages;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            0,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn customer_row(first: &str, last: &str, birth: &str, gender: &str) -> RawRow {
        row(&[
            ("firstName", first),
            ("lastName", last),
            ("birthDate", birth),
            ("gender", gender),
        ])
    }

    fn reading_row(values: [&str; 7]) -> RawRow {
        let headers = ImportType::Readings.headers();
        RawRow::new(
            0,
            headers
                .iter()
                .zip(values.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn john_doe() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::M,
        }
    }

    // ===== 客户行 =====

    #[test]
    fn test_customer_valid_row() {
        let validated = CustomerRowValidator::new().validate(&customer_row("John", "Doe", "1990-01-15", "M"));

        assert!(validated.is_importable());
        assert_eq!(validated.fields.first_name, "John");
        assert_eq!(validated.fields.last_name, "Doe");
        assert_eq!(validated.fields.gender_value, Some(Gender::M));
    }

    #[test]
    fn test_customer_missing_last_name_only() {
        let validated = CustomerRowValidator::new().validate(&customer_row("John", "", "1990-01-15", "M"));

        assert_eq!(validated.errors, vec![messages::LAST_NAME_REQUIRED]);
    }

    #[test]
    fn test_customer_normalizes_regardless_of_validity() {
        let validated = CustomerRowValidator::new().validate(&customer_row("  John ", "", " 1990-02-30 ", " w "));

        assert_eq!(
            validated.errors,
            vec![messages::LAST_NAME_REQUIRED, messages::INVALID_DATE]
        );
        assert_eq!(validated.fields.first_name, "John");
        assert_eq!(validated.fields.birth_date, "1990-02-30");
        assert_eq!(validated.fields.gender, "W");
        assert_eq!(validated.fields.birth_date_value, None);
    }

    #[test]
    fn test_customer_all_fields_missing() {
        let validated = CustomerRowValidator::new().validate(&row(&[]));

        assert_eq!(
            validated.errors,
            vec![
                messages::FIRST_NAME_REQUIRED,
                messages::LAST_NAME_REQUIRED,
                messages::BIRTH_DATE_REQUIRED,
                messages::GENDER_REQUIRED,
            ]
        );
    }

    #[test]
    fn test_customer_validation_does_not_mutate_input() {
        let input = customer_row(" john ", "doe", "1990-01-15", "m");
        let before = input.clone();

        let _ = CustomerRowValidator::new().validate(&input);

        assert_eq!(input, before);
    }

    // ===== 抄表行 =====

    #[test]
    fn test_reading_valid_row_resolves_customer_snapshot() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "John Doe",
            "2024-01-15",
            "METER001",
            "STROM",
            "150.5",
            "false",
            "Regular reading",
        ]));

        assert!(validated.is_importable(), "errors: {:?}", validated.errors);
        assert_eq!(validated.fields.customer.as_ref(), Some(&roster[0]));
        assert_eq!(validated.fields.meter_count_value, Some(150.5));
        assert_eq!(validated.fields.kind_of_meter_value, Some(KindOfMeter::Strom));
        assert!(!validated.fields.substitute_flag());
        assert_eq!(validated.fields.comment.as_deref(), Some("Regular reading"));
    }

    #[test]
    fn test_reading_unknown_customer() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "Jane X", "2024-01-15", "METER002", "WASSER", "75.2", "true", "",
        ]));

        assert_eq!(validated.errors, vec![messages::CUSTOMER_NOT_FOUND]);
        assert_eq!(validated.fields.customer, None);
        assert_eq!(validated.fields.comment, None);
    }

    #[test]
    fn test_reading_negative_count() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "John Doe", "2024-01-15", "METER001", "STROM", "-5", "false", "",
        ]));

        assert_eq!(validated.errors, vec![messages::INVALID_METER_COUNT]);
        assert_eq!(validated.fields.meter_count, "-5");
    }

    #[test]
    fn test_reading_lowercase_kind_is_normalized() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "John Doe", "2024-01-15", "METER001", "strom", "1", "0", "",
        ]));

        assert!(validated.is_importable());
        assert_eq!(validated.fields.kind_of_meter, "STROM");
    }

    #[test]
    fn test_reading_substitute_zero_and_false_count_as_present() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        for value in ["false", "0", "FALSE", "1", "True"] {
            let validated = validator.validate(&reading_row([
                "John Doe", "2024-01-15", "METER001", "STROM", "1", value, "",
            ]));
            assert!(validated.is_importable(), "substitute={}", value);
        }

        let missing = validator.validate(&reading_row([
            "John Doe", "2024-01-15", "METER001", "STROM", "1", "", "",
        ]));
        assert_eq!(missing.errors, vec![messages::SUBSTITUTE_REQUIRED]);
    }

    #[test]
    fn test_reading_whitespace_substitute_is_present_and_false() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "John Doe", "2024-01-15", "METER001", "STROM", "1", "  ", "",
        ]));

        assert!(validated.is_importable());
        assert_eq!(validated.fields.substitute, "");
        assert!(!validated.fields.substitute_flag());
        let reading = validated.fields.to_entity(Uuid::new_v4()).unwrap();
        assert!(!reading.substitute);
    }

    #[test]
    fn test_reading_accumulates_all_errors_in_order() {
        let validator = ReadingRowValidator::new(&[], DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "Nobody Here", "2024-02-30", "", "GAS", "abc", "", "",
        ]));

        assert_eq!(
            validated.errors,
            vec![
                messages::METER_ID_REQUIRED,
                messages::SUBSTITUTE_REQUIRED,
                messages::INVALID_DATE,
                messages::INVALID_KIND_OF_METER,
                messages::INVALID_METER_COUNT,
                messages::CUSTOMER_NOT_FOUND,
            ]
        );
    }

    #[test]
    fn test_reading_missing_name_has_no_not_found_error() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);

        let validated = validator.validate(&reading_row([
            "", "2024-01-15", "METER001", "STROM", "1", "true", "",
        ]));

        assert_eq!(validated.errors, vec![messages::CUSTOMER_NAME_REQUIRED]);
    }

    #[test]
    fn test_reading_duplicate_roster_names() {
        let roster = vec![john_doe(), john_doe()];
        let row = reading_row(["John Doe", "2024-01-15", "METER001", "STROM", "1", "true", ""]);

        let rejected = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject).validate(&row);
        assert_eq!(rejected.errors, vec![messages::CUSTOMER_AMBIGUOUS]);
        assert_eq!(rejected.fields.customer, None);

        let first = ReadingRowValidator::new(&roster, DuplicateNamePolicy::FirstMatch).validate(&row);
        assert!(first.is_importable());
        assert_eq!(first.fields.customer.as_ref().map(|c| c.id), Some(roster[0].id));
    }

    #[test]
    fn test_reading_validation_is_idempotent() {
        let roster = vec![john_doe()];
        let validator = ReadingRowValidator::new(&roster, DuplicateNamePolicy::Reject);
        let row = reading_row(["john doe ", "2024-01-15", " M1 ", "wasser", "3.5", " TRUE ", " x "]);

        let a = validator.validate(&row);
        let b = validator.validate(&row);

        assert_eq!(a, b);
        assert_eq!(a.fields.substitute, "true");
        assert_eq!(a.fields.meter_id, "M1");
        assert_eq!(a.fields.comment.as_deref(), Some("x"));
    }
}
