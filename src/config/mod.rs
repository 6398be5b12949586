// ==========================================
// 客户与抄表导入系统 - 配置层
// ==========================================
// 职责: 导入参数管理，config_kv 覆写 + 内置默认值
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod import_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::{ConfigError, ImportConfigReader};
pub use import_settings::{ImportSettings, DEFAULT_PREVIEW_ROW_LIMIT};
