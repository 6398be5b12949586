// ==========================================
// 客户与抄表导入系统 - 导入层
// ==========================================
// 职责: CSV 文本 → 已校验行 → 可导入实体 / 拒绝行
// 流程: 解析 → 校验/规范化 → 汇总（纯计算，不落库）
// ==========================================

// 模块声明
pub mod aggregator;
pub mod csv_importer;
pub mod customer_resolver;
pub mod data_cleaner;
pub mod error;
pub mod field_rules;
pub mod file_parser;
pub mod import_trait;
pub mod report;
pub mod row_validator;
pub mod templates;

// 重导出核心类型
pub use aggregator::ResultAggregator;
pub use csv_importer::CsvImporter;
pub use customer_resolver::{resolve_customer, CustomerMatch};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_rules::{messages, FieldRule, FieldRuleSet, RuleContext, RuleKind};
pub use file_parser::{CsvParser, ParsedCsv};
pub use report::write_rejected_csv;
pub use row_validator::{CustomerRowValidator, ReadingRowValidator};
pub use templates::{template_file_name, template_for};

// 重导出 Trait 接口
pub use import_trait::{FileParser, RowValidator};
