// ==========================================
// 客户与抄表导入系统 - 客户仓储
// ==========================================
// 职责: customers 表读写（逐条创建，不做批量/事务）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::{Customer, Gender};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// CustomerRepository Trait
// ==========================================
// 用途: 客户导入的落库目标 + 抄表导入的花名册来源
// 实现者: CustomerRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 创建单个客户
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): id 已存在
    async fn create(&self, customer: &Customer) -> RepositoryResult<()>;

    /// 全部客户（按插入顺序，即花名册顺序）
    async fn find_all(&self) -> RepositoryResult<Vec<Customer>>;

    /// 按 id 查询
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>>;
}

// ==========================================
// CustomerRepositoryImpl
// ==========================================
pub struct CustomerRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl CustomerRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 共享已有连接（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn create(&self, customer: &Customer) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO customers (id, first_name, last_name, birth_date, gender)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                customer.id.to_string(),
                customer.first_name,
                customer.last_name,
                customer.birth_date,
                customer.gender.code(),
            ],
        )?;
        debug!(customer_id = %customer.id, "客户已创建");
        Ok(())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Customer>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, first_name, last_name, birth_date, gender FROM customers ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], CustomerRow::from_row)?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?.into_customer()?);
        }
        Ok(customers)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Customer>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                "SELECT id, first_name, last_name, birth_date, gender FROM customers WHERE id = ?1",
                params![id.to_string()],
                CustomerRow::from_row,
            )
            .optional()?;

        row.map(CustomerRow::into_customer).transpose()
    }
}

// ==========================================
// CustomerRow - customers 表行（列原值）
// ==========================================
// 列前缀 offset 供抄表查询 JOIN 复用
pub(crate) struct CustomerRow {
    id: String,
    first_name: String,
    last_name: String,
    birth_date: Option<String>,
    gender: Option<String>,
}

impl CustomerRow {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Self::from_row_at(row, 0)
    }

    pub(crate) fn from_row_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            first_name: row.get(offset + 1)?,
            last_name: row.get(offset + 2)?,
            birth_date: row.get(offset + 3)?,
            gender: row.get(offset + 4)?,
        })
    }

    pub(crate) fn into_customer(self) -> RepositoryResult<Customer> {
        let id = parse_uuid("customers.id", &self.id)?;
        let birth_date = self
            .birth_date
            .as_deref()
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            .ok_or_else(|| RepositoryError::FieldValueError {
                field: "customers.birth_date".to_string(),
                message: format!("无效日期: {:?} (id={})", self.birth_date, self.id),
            })?;
        let gender = self
            .gender
            .as_deref()
            .unwrap_or("")
            .parse::<Gender>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "customers.gender".to_string(),
                message,
            })?;

        Ok(Customer {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date,
            gender,
        })
    }
}

pub(crate) fn parse_uuid(field: &str, raw: &str) -> RepositoryResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("{} ({})", e, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn repo() -> (NamedTempFile, CustomerRepositoryImpl) {
        let file = NamedTempFile::new().unwrap();
        let repo = CustomerRepositoryImpl::new(file.path().to_str().unwrap()).unwrap();
        (file, repo)
    }

    fn customer(first: &str, last: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::W,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_file, repo) = repo();
        let jane = customer("Jane", "Smith");

        repo.create(&jane).await.unwrap();

        assert_eq!(repo.find_by_id(jane.id).await.unwrap(), Some(jane.clone()));
        assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insert_order() {
        let (_file, repo) = repo();
        let first = customer("Zoe", "Adams");
        let second = customer("Adam", "Zed");
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let all = repo.find_all().await.unwrap();

        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let (_file, repo) = repo();
        let jane = customer("Jane", "Smith");
        repo.create(&jane).await.unwrap();

        let err = repo.create(&jane).await.unwrap_err();

        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }
}
