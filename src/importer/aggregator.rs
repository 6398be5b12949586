// ==========================================
// 客户与抄表导入系统 - 结果汇总器
// ==========================================
// 职责: 已校验行 → 可导入实体 / 拒绝行 两个分区 + 预览 + 汇总
// 保证: 两分区不相交且覆盖全部输入，分区内保持源顺序
// ==========================================

use crate::domain::{ImportOutcome, ImportType, NormalizedRecord, ValidatedRow};
use tracing::{debug, error};
use uuid::Uuid;

/// 规范化值不足以构造实体时挂到行上的消息
pub const INCOMPLETE_ROW: &str = "Row could not be converted to an importable record";

pub struct ResultAggregator {
    preview_limit: usize,
}

impl ResultAggregator {
    pub fn new(preview_limit: usize) -> Self {
        Self { preview_limit }
    }

    /// 分区并为每个可导入行生成新的 UUID
    pub fn aggregate<F>(
        &self,
        import_type: ImportType,
        rows: Vec<ValidatedRow<F>>,
    ) -> ImportOutcome<F::Entity, F>
    where
        F: NormalizedRecord + Clone,
    {
        let total = rows.len();
        let preview: Vec<ValidatedRow<F>> = rows.iter().take(self.preview_limit).cloned().collect();

        let mut valid_rows = Vec::new();
        let mut rejected_rows = Vec::new();

        for mut row in rows {
            if !row.is_importable() {
                debug!(
                    row = row.raw.row_number(),
                    errors = %row.error_text(),
                    "行校验未通过"
                );
                rejected_rows.push(row);
                continue;
            }

            match row.fields.to_entity(Uuid::new_v4()) {
                Some(entity) => valid_rows.push(entity),
                None => {
                    error!(row = row.raw.row_number(), "无错误行无法构造实体");
                    row.errors.push(INCOMPLETE_ROW.to_string());
                    rejected_rows.push(row);
                }
            }
        }

        ImportOutcome {
            import_type,
            total,
            valid_rows,
            rejected_rows,
            preview,
        }
    }
}
