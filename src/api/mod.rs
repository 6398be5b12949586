// ==========================================
// 客户与抄表导入系统 - API 层
// ==========================================
// 职责: 提供导入预览/提交接口，供命令行及上层调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportPreview, SubmitFailure, SubmitReport};
