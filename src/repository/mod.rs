// ==========================================
// 客户与抄表导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 导入结果的落库目标（逐条创建），屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod customer_repo;
pub mod error;
pub mod reading_repo;

// 重导出核心仓储
pub use customer_repo::{CustomerRepository, CustomerRepositoryImpl};
pub use error::{RepositoryError, RepositoryResult};
pub use reading_repo::{ReadingRepository, ReadingRepositoryImpl};
