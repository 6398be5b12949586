// ==========================================
// 客户与抄表导入系统 - 导入模板
// ==========================================
// 职责: 每种导入类型提供 表头 + 示例行 的 CSV 模板
// ==========================================

use crate::domain::ImportType;

const CUSTOMERS_TEMPLATE: &str = "firstName,lastName,birthDate,gender
John,Doe,1990-01-15,M
Jane,Smith,1985-07-22,W
Alex,Johnson,1992-03-10,D
";

const READINGS_TEMPLATE: &str =
    "customerName,dateOfReading,meterId,kindOfMeter,meterCount,substitute,comment
John Doe,2024-01-15,METER001,STROM,150.5,false,Regular reading
Jane Smith,2024-01-15,METER002,WASSER,75.2,true,Estimated reading
";

/// 模板文本
pub fn template_for(import_type: ImportType) -> &'static str {
    match import_type {
        ImportType::Customers => CUSTOMERS_TEMPLATE,
        ImportType::Readings => READINGS_TEMPLATE,
    }
}

/// 模板下载文件名，如 `customers_template.csv`
pub fn template_file_name(import_type: ImportType) -> String {
    format!("{}_template.csv", import_type)
}
