// ==========================================
// 客户与抄表导入系统 - CSV 导入管道
// ==========================================
// 流程: 解析 → 逐行校验/规范化 → 汇总
// 红线: 纯函数，不落库；相同输入 + 花名册 → 相同错误与规范化值（id 除外）
// ==========================================

use crate::config::ImportSettings;
use crate::domain::{
    Customer, CustomerImportOutcome, ImportOutcome, ImportType, NormalizedRecord, RawRow,
    ReadingImportOutcome,
};
use crate::importer::aggregator::ResultAggregator;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{CsvParser, ParsedCsv};
use crate::importer::import_trait::{FileParser, RowValidator};
use crate::importer::row_validator::{CustomerRowValidator, ReadingRowValidator};
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// CsvImporter - 导入管道入口
// ==========================================
pub struct CsvImporter {
    settings: ImportSettings,
}

impl CsvImporter {
    pub fn new(settings: ImportSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// 校验已解析的行并汇总
    ///
    /// # 参数
    /// - validator: 行校验器（决定导入类型）
    /// - rows: 原始行（只读）
    pub fn run<V>(
        &self,
        validator: &V,
        rows: &[RawRow],
    ) -> ImportOutcome<<V::Fields as NormalizedRecord>::Entity, V::Fields>
    where
        V: RowValidator,
    {
        let import_type = validator.import_type();
        let validated: Vec<_> = rows.iter().map(|row| validator.validate(row)).collect();

        let outcome =
            ResultAggregator::new(self.settings.preview_row_limit).aggregate(import_type, validated);

        info!(
            import_type = %import_type,
            total = outcome.total,
            valid = outcome.valid_count(),
            rejected = outcome.error_count(),
            "导入校验完成"
        );
        outcome
    }

    // ==========================================
    // 客户导入
    // ==========================================

    pub fn validate_customers(&self, rows: &[RawRow]) -> CustomerImportOutcome {
        self.run(&CustomerRowValidator::new(), rows)
    }

    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn import_customers_str(&self, text: &str) -> ImportResult<CustomerImportOutcome> {
        let parsed = self.parse_str(ImportType::Customers, text)?;
        Ok(self.validate_customers(&parsed.rows))
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn import_customers_file(&self, path: &Path) -> ImportResult<CustomerImportOutcome> {
        let parsed = self.parse_file(ImportType::Customers, path)?;
        Ok(self.validate_customers(&parsed.rows))
    }

    // ==========================================
    // 抄表导入（需要客户花名册）
    // ==========================================

    pub fn validate_readings(&self, rows: &[RawRow], roster: &[Customer]) -> ReadingImportOutcome {
        let validator = ReadingRowValidator::new(roster, self.settings.duplicate_name_policy);
        self.run(&validator, rows)
    }

    #[instrument(skip(self, text, roster), fields(bytes = text.len(), roster = roster.len()))]
    pub fn import_readings_str(
        &self,
        text: &str,
        roster: &[Customer],
    ) -> ImportResult<ReadingImportOutcome> {
        let parsed = self.parse_str(ImportType::Readings, text)?;
        Ok(self.validate_readings(&parsed.rows, roster))
    }

    #[instrument(skip(self, path, roster), fields(path = %path.display(), roster = roster.len()))]
    pub fn import_readings_file(
        &self,
        path: &Path,
        roster: &[Customer],
    ) -> ImportResult<ReadingImportOutcome> {
        let parsed = self.parse_file(ImportType::Readings, path)?;
        Ok(self.validate_readings(&parsed.rows, roster))
    }

    // ==========================================
    // 内部: 解析
    // ==========================================

    fn parse_str(&self, import_type: ImportType, text: &str) -> ImportResult<ParsedCsv> {
        let parsed = CsvParser::for_import_type(import_type).parse_str(text)?;
        warn_missing_headers(import_type, &parsed);
        Ok(parsed)
    }

    fn parse_file(&self, import_type: ImportType, path: &Path) -> ImportResult<ParsedCsv> {
        let parsed = CsvParser::for_import_type(import_type).parse_file(path)?;
        warn_missing_headers(import_type, &parsed);
        Ok(parsed)
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new(ImportSettings::default())
    }
}

/// 缺列不是结构错误: 对应字段按空值走必填规则
fn warn_missing_headers(import_type: ImportType, parsed: &ParsedCsv) {
    if parsed.headers.is_empty() {
        return;
    }
    let missing = parsed.missing_headers(import_type.headers());
    if !missing.is_empty() {
        warn!(import_type = %import_type, missing = ?missing, "表头缺少预期列");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DuplicateNamePolicy, Gender};
    use crate::importer::field_rules::messages;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn john_doe() -> Customer {
        Customer {
            id: Uuid::new_v4(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::M,
        }
    }

    #[test]
    fn test_customers_end_to_end() {
        let text = "firstName,lastName,birthDate,gender\nJohn,Doe,1990-01-15,M\nJohn,,1990-01-15,M\n";

        let outcome = CsvImporter::default().import_customers_str(text).unwrap();

        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.valid_rows.len(), 1);
        assert_eq!(outcome.rejected_rows[0].errors, vec![messages::LAST_NAME_REQUIRED]);
        assert_eq!(outcome.rejected_rows[0].index(), 1);
    }

    #[test]
    fn test_header_only_input_is_empty_outcome() {
        let outcome = CsvImporter::default()
            .import_customers_str("firstName,lastName,birthDate,gender\n")
            .unwrap();

        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.summary().error_count, 0);
    }

    #[test]
    fn test_missing_column_fails_required_rule() {
        let text = "firstName,lastName,birthDate\nJohn,Doe,1990-01-15\n";

        let outcome = CsvImporter::default().import_customers_str(text).unwrap();

        assert_eq!(outcome.rejected_rows[0].errors, vec![messages::GENDER_REQUIRED]);
    }

    #[test]
    fn test_readings_use_configured_policy() {
        let roster = vec![john_doe(), john_doe()];
        let text = "customerName,dateOfReading,meterId,kindOfMeter,meterCount,substitute,comment\n\
                    John Doe,2024-01-15,METER001,STROM,150.5,false,\n";

        let rejecting = CsvImporter::default().import_readings_str(text, &roster).unwrap();
        assert_eq!(
            rejecting.rejected_rows[0].errors,
            vec![messages::CUSTOMER_AMBIGUOUS]
        );

        let first_match = CsvImporter::new(ImportSettings {
            duplicate_name_policy: DuplicateNamePolicy::FirstMatch,
            ..ImportSettings::default()
        })
        .import_readings_str(text, &roster)
        .unwrap();
        assert_eq!(first_match.valid_rows[0].customer, roster[0]);
        assert_eq!(first_match.valid_rows[0].comment, None);
    }
}
