// ==========================================
// 客户与抄表导入系统 - 拒绝行报告
// ==========================================
// 输出列: row（1 起行号）+ 导入类型表头（规范化值）+ errors（"; " 连接）
// ==========================================

use crate::domain::{ImportType, NormalizedRecord, ValidatedRow};
use crate::importer::error::{ImportError, ImportResult};
use csv::Writer;
use std::io::Write;
use tracing::debug;

pub const ERROR_SEPARATOR: &str = "; ";

/// 将拒绝行写为 CSV
///
/// # 参数
/// - import_type: 决定表头列
/// - rows: 拒绝行（按源顺序）
/// - writer: 输出目标
///
/// # 返回
/// - Ok(usize): 写出的数据行数
pub fn write_rejected_csv<F, W>(
    import_type: ImportType,
    rows: &[ValidatedRow<F>],
    writer: W,
) -> ImportResult<usize>
where
    F: NormalizedRecord,
    W: Write,
{
    let mut out = Writer::from_writer(writer);

    let mut header = vec!["row"];
    header.extend_from_slice(import_type.headers());
    header.push("errors");
    out.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.raw.row_number().to_string()];
        record.extend(row.fields.column_values());
        record.push(row.errors.join(ERROR_SEPARATOR));
        out.write_record(&record)?;
    }

    out.flush()
        .map_err(|e| ImportError::ReportWriteError(e.to_string()))?;

    debug!(import_type = %import_type, rows = rows.len(), "拒绝行报告已写出");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::csv_importer::CsvImporter;

    #[test]
    fn test_report_columns_and_joined_errors() {
        let text = "firstName,lastName,birthDate,gender\n\
                    John,Doe,1990-01-15,M\n\
                    ,Doe,1990-13-01,x\n";
        let outcome = CsvImporter::default().import_customers_str(text).unwrap();

        let mut buf = Vec::new();
        let written =
            write_rejected_csv(ImportType::Customers, &outcome.rejected_rows, &mut buf).unwrap();
        let report = String::from_utf8(buf).unwrap();

        assert_eq!(written, 1);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "row,firstName,lastName,birthDate,gender,errors");
        assert_eq!(
            lines[1],
            "2,,Doe,1990-13-01,X,\"First name is required; Invalid date format (use YYYY-MM-DD); Gender must be M, W, D, or U\""
        );
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let mut buf = Vec::new();
        let written = write_rejected_csv::<crate::domain::ReadingFields, _>(
            ImportType::Readings,
            &[],
            &mut buf,
        )
        .unwrap();

        assert_eq!(written, 0);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "row,customerName,dateOfReading,meterId,kindOfMeter,meterCount,substitute,comment,errors\n"
        );
    }
}
