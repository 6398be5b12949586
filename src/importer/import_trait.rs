// ==========================================
// 客户与抄表导入系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: FileParser → RowValidator → ResultAggregator
// ==========================================

use crate::domain::{ImportType, NormalizedRecord, RawRow, ValidatedRow};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParsedCsv;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 参数
    /// - file_path: 文件路径（.csv）
    ///
    /// # 返回
    /// - Ok(ParsedCsv): 表头 + 行记录（无数据行时为空序列）
    /// - Err: 文件不存在、格式不支持、内容不可读
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedCsv>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 行校验与类型转换接口（阶段 2）
// 实现者: CustomerRowValidator, ReadingRowValidator
//
// 红线:
// - 不短路: 每条规则都执行，全部违规消息按规则顺序收集
// - 不修改输入行，规范化值无论校验结果如何都会计算
pub trait RowValidator {
    type Fields: NormalizedRecord + Clone;

    /// 当前校验器对应的导入类型
    fn import_type(&self) -> ImportType;

    /// 校验并规范化单行
    ///
    /// # 参数
    /// - row: 原始行（只读）
    ///
    /// # 返回
    /// - ValidatedRow: 原始行 + 规范化字段 + 错误消息列表
    fn validate(&self, row: &RawRow) -> ValidatedRow<Self::Fields>;
}
