// ==========================================
// 客户与抄表导入系统 - 导入API
// ==========================================
// 职责: 读取输入 → 校验管道 → 逐条提交可导入实体
// 约束: 逐条 create，不做批量/事务；部分失败如实报告，不回滚
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::{
    CustomerImportOutcome, ImportSummary, ImportType, ReadingImportOutcome,
};
use crate::importer::CsvImporter;
use crate::repository::{
    CustomerRepository, CustomerRepositoryImpl, ReadingRepository, ReadingRepositoryImpl,
    RepositoryResult,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 单条提交失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitFailure {
    /// 实体 id（导入时新生成）
    pub id: Uuid,
    /// 失败原因
    pub message: String,
}

/// 提交结果（顺序与 validRows 一致）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitReport {
    /// 成功创建的实体数
    pub submitted: usize,
    /// 失败明细
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<SubmitFailure>,
}

impl SubmitReport {
    pub fn total(&self) -> usize {
        self.submitted + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn from_results(results: Vec<(Uuid, RepositoryResult<()>)>) -> Self {
        let mut report = SubmitReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.submitted += 1,
                Err(e) => {
                    warn!(entity_id = %id, error = %e, "实体提交失败");
                    report.failed.push(SubmitFailure {
                        id,
                        message: e.to_string(),
                    });
                }
            }
        }
        report
    }
}

/// 按导入类型区分的预览结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "importType", content = "outcome", rename_all = "lowercase")]
pub enum ImportPreview {
    Customers(CustomerImportOutcome),
    Readings(ReadingImportOutcome),
}

impl ImportPreview {
    pub fn summary(&self) -> ImportSummary {
        match self {
            ImportPreview::Customers(outcome) => outcome.summary(),
            ImportPreview::Readings(outcome) => outcome.summary(),
        }
    }
}

/// 导入API
pub struct ImportApi {
    customer_repo: Arc<dyn CustomerRepository>,
    reading_repo: Arc<dyn ReadingRepository>,
    config: Arc<dyn ImportConfigReader>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    ///
    /// # 参数
    /// - customer_repo: 客户仓储（花名册来源 + 客户提交目标）
    /// - reading_repo: 抄表仓储（抄表提交目标）
    /// - config: 导入配置读取器
    pub fn new(
        customer_repo: Arc<dyn CustomerRepository>,
        reading_repo: Arc<dyn ReadingRepository>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            customer_repo,
            reading_repo,
            config,
        }
    }

    /// 基于单个 SQLite 文件组装（仓储与配置共享同一连接）
    pub fn from_db_path(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .and_then(|conn| ensure_schema(&conn).map(|_| conn))
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self::new(
            Arc::new(CustomerRepositoryImpl::from_connection(conn.clone())),
            Arc::new(ReadingRepositoryImpl::from_connection(conn)),
            Arc::new(config),
        ))
    }

    /// 按当前配置创建导入管道
    async fn importer(&self) -> ApiResult<CsvImporter> {
        let settings = self
            .config
            .load_import_settings()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(CsvImporter::new(settings))
    }

    // ==========================================
    // 预览（只校验，不落库）
    // ==========================================

    /// 预览客户导入
    ///
    /// # 返回
    /// - Ok(CustomerImportOutcome): 可导入实体 + 拒绝行 + 前 N 行预览
    /// - Err(ApiError::ImportError): 输入结构错误
    pub async fn preview_customers(&self, text: &str) -> ApiResult<CustomerImportOutcome> {
        let importer = self.importer().await?;
        Ok(importer.import_customers_str(text)?)
    }

    /// 预览抄表导入（从客户仓储加载花名册）
    pub async fn preview_readings(&self, text: &str) -> ApiResult<ReadingImportOutcome> {
        let importer = self.importer().await?;
        let roster = self.customer_repo.find_all().await?;
        Ok(importer.import_readings_str(text, &roster)?)
    }

    /// 读取文件并预览
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn preview_file(
        &self,
        import_type: ImportType,
        path: &Path,
    ) -> ApiResult<ImportPreview> {
        let importer = self.importer().await?;

        let preview = match import_type {
            ImportType::Customers => {
                ImportPreview::Customers(importer.import_customers_file(path)?)
            }
            ImportType::Readings => {
                let roster = self.customer_repo.find_all().await?;
                ImportPreview::Readings(importer.import_readings_file(path, &roster)?)
            }
        };

        let summary = preview.summary();
        info!(
            import_type = %import_type,
            total = summary.total,
            valid = summary.valid_count,
            rejected = summary.error_count,
            "文件预览完成"
        );
        Ok(preview)
    }

    // ==========================================
    // 提交（逐条 create）
    // ==========================================

    /// 提交客户导入的可导入实体
    ///
    /// # 返回
    /// - Ok(SubmitReport): 成功数 + 失败明细
    /// - Err(ApiError::NothingToImport): 无可导入行
    #[instrument(skip(self, outcome), fields(valid = outcome.valid_count()))]
    pub async fn submit_customers(&self, outcome: &CustomerImportOutcome) -> ApiResult<SubmitReport> {
        if outcome.valid_rows.is_empty() {
            return Err(ApiError::NothingToImport);
        }

        let results = join_all(outcome.valid_rows.iter().map(|customer| async move {
            (customer.id, self.customer_repo.create(customer).await)
        }))
        .await;

        let report = SubmitReport::from_results(results);
        info!(
            submitted = report.submitted,
            failed = report.failed.len(),
            "客户提交完成"
        );
        Ok(report)
    }

    /// 提交抄表导入的可导入实体
    #[instrument(skip(self, outcome), fields(valid = outcome.valid_count()))]
    pub async fn submit_readings(&self, outcome: &ReadingImportOutcome) -> ApiResult<SubmitReport> {
        if outcome.valid_rows.is_empty() {
            return Err(ApiError::NothingToImport);
        }

        let results = join_all(outcome.valid_rows.iter().map(|reading| async move {
            (reading.id, self.reading_repo.create(reading).await)
        }))
        .await;

        let report = SubmitReport::from_results(results);
        info!(
            submitted = report.submitted,
            failed = report.failed.len(),
            "抄表提交完成"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;

    #[test]
    fn test_submit_report_keeps_order_of_failures() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let results = vec![
            (
                ids[0],
                Err(RepositoryError::UniqueConstraintViolation("a".to_string())),
            ),
            (ids[1], Ok(())),
            (
                ids[2],
                Err(RepositoryError::ForeignKeyViolation("b".to_string())),
            ),
        ];

        let report = SubmitReport::from_results(results);

        assert_eq!(report.submitted, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_complete());
        let failed: Vec<Uuid> = report.failed.iter().map(|f| f.id).collect();
        assert_eq!(failed, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_submit_report_json_omits_empty_failures() {
        let report = SubmitReport {
            submitted: 2,
            failed: Vec::new(),
        };

        assert_eq!(serde_json::to_string(&report).unwrap(), r#"{"submitted":2}"#);
    }
}
