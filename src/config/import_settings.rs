// ==========================================
// 客户与抄表导入系统 - 导入参数快照
// ==========================================
// 用途: 配置层解析后的纯值，传入导入管道（管道本身不读配置存储）
// ==========================================

use crate::domain::DuplicateNamePolicy;
use serde::{Deserialize, Serialize};

/// 预览行数默认值
pub const DEFAULT_PREVIEW_ROW_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    /// 花名册重名时的处理策略
    pub duplicate_name_policy: DuplicateNamePolicy,
    /// 预览展示的前 N 行
    pub preview_row_limit: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            duplicate_name_policy: DuplicateNamePolicy::Reject,
            preview_row_limit: DEFAULT_PREVIEW_ROW_LIMIT,
        }
    }
}
