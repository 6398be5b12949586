// ==========================================
// 客户与抄表导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: CSV 导入校验（逐行规则 + 类型转换 + 客户名称解析 + 结果汇总）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 解析/校验/汇总
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 数据仓储层 - 逐条落库
pub mod repository;

// API 层 - 预览与提交
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DuplicateNamePolicy, Gender, ImportType, KindOfMeter};

// 领域实体
pub use domain::{Customer, ImportOutcome, ImportSummary, RawRow, Reading, ValidatedRow};

// 导入管道
pub use importer::{CsvImporter, ImportError, ImportResult};

// 配置
pub use config::ImportSettings;

// API
pub use api::{ApiError, ImportApi, SubmitReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "客户与抄表导入系统";
