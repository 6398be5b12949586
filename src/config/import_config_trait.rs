// ==========================================
// 客户与抄表导入系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::import_settings::ImportSettings;
use crate::domain::DuplicateNamePolicy;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取花名册重名处理策略
    ///
    /// # 返回
    /// - DuplicateNamePolicy::Reject: 同名多于一个时该行报错
    /// - DuplicateNamePolicy::FirstMatch: 取花名册中第一个
    ///
    /// # 默认值
    /// - REJECT
    async fn get_duplicate_name_policy(&self) -> Result<DuplicateNamePolicy, ConfigError>;

    /// 获取预览行数
    ///
    /// # 默认值
    /// - 10
    async fn get_preview_row_limit(&self) -> Result<usize, ConfigError>;

    /// 一次性读取导入参数快照
    async fn load_import_settings(&self) -> Result<ImportSettings, ConfigError> {
        Ok(ImportSettings {
            duplicate_name_policy: self.get_duplicate_name_policy().await?,
            preview_row_limit: self.get_preview_row_limit().await?,
        })
    }
}
