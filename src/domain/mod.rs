// ==========================================
// 客户与抄表导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入管道中间结构
// 红线: 不含数据访问逻辑,不含校验规则
// ==========================================

pub mod customer;
pub mod import;
pub mod reading;
pub mod types;

// 重导出核心类型
pub use customer::Customer;
pub use import::{
    CustomerFields, CustomerImportOutcome, ImportOutcome, ImportSummary, NormalizedRecord,
    RawRow, ReadingFields, ReadingImportOutcome, ValidatedCustomerRow, ValidatedReadingRow,
    ValidatedRow,
};
pub use reading::Reading;
pub use types::{DuplicateNamePolicy, Gender, ImportType, KindOfMeter};
