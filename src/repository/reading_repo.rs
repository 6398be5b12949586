// ==========================================
// 客户与抄表导入系统 - 抄表仓储
// ==========================================
// 职责: readings 表读写（逐条创建，不做批量/事务）
// 存储: customer_id 外键引用 customers(id)，读取时 JOIN 还原客户快照
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::{KindOfMeter, Reading};
use crate::repository::customer_repo::{parse_uuid, CustomerRow};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// ReadingRepository Trait
// ==========================================
// 实现者: ReadingRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// 创建单条抄表记录
    ///
    /// # 返回
    /// - Err(ForeignKeyViolation): 引用的客户不存在
    async fn create(&self, reading: &Reading) -> RepositoryResult<()>;

    /// 查询客户的全部抄表记录（按抄表日期、插入顺序）
    async fn find_by_customer(&self, customer_id: Uuid) -> RepositoryResult<Vec<Reading>>;
}

// ==========================================
// ReadingRepositoryImpl
// ==========================================
pub struct ReadingRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ReadingRepositoryImpl {
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
impl ReadingRepository for ReadingRepositoryImpl {
    async fn create(&self, reading: &Reading) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO readings (
                id, customer_id, comment, date_of_reading,
                kind_of_meter, meter_count, meter_id, substitute
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                reading.id.to_string(),
                reading.customer.id.to_string(),
                reading.comment,
                reading.date_of_reading,
                reading.kind_of_meter.code(),
                reading.meter_count,
                reading.meter_id,
                reading.substitute,
            ],
        )?;
        debug!(reading_id = %reading.id, customer_id = %reading.customer.id, "抄表记录已创建");
        Ok(())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> RepositoryResult<Vec<Reading>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.id, r.comment, r.date_of_reading, r.kind_of_meter,
                   r.meter_count, r.meter_id, r.substitute,
                   c.id, c.first_name, c.last_name, c.birth_date, c.gender
            FROM readings r
            JOIN customers c ON c.id = r.customer_id
            WHERE r.customer_id = ?1
            ORDER BY r.date_of_reading, r.rowid
            "#,
        )?;

        let rows = stmt.query_map(params![customer_id.to_string()], |row| {
            Ok((
                ReadingRow {
                    id: row.get(0)?,
                    comment: row.get(1)?,
                    date_of_reading: row.get(2)?,
                    kind_of_meter: row.get(3)?,
                    meter_count: row.get(4)?,
                    meter_id: row.get(5)?,
                    substitute: row.get(6)?,
                },
                CustomerRow::from_row_at(row, 7)?,
            ))
        })?;

        let mut readings = Vec::new();
        for row in rows {
            let (reading, customer) = row?;
            readings.push(reading.into_reading(customer)?);
        }
        Ok(readings)
    }
}

// readings 表行（列原值）
struct ReadingRow {
    id: String,
    comment: Option<String>,
    date_of_reading: Option<String>,
    kind_of_meter: Option<String>,
    meter_count: Option<f64>,
    meter_id: Option<String>,
    substitute: Option<bool>,
}

impl ReadingRow {
    fn into_reading(self, customer: CustomerRow) -> RepositoryResult<Reading> {
        let field_error = |field: &str, message: String| RepositoryError::FieldValueError {
            field: field.to_string(),
            message,
        };

        let id = parse_uuid("readings.id", &self.id)?;
        let date_of_reading = self
            .date_of_reading
            .as_deref()
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
            .ok_or_else(|| {
                field_error(
                    "readings.date_of_reading",
                    format!("无效日期: {:?} (id={})", self.date_of_reading, self.id),
                )
            })?;
        let kind_of_meter = self
            .kind_of_meter
            .as_deref()
            .unwrap_or("")
            .parse::<KindOfMeter>()
            .map_err(|message| field_error("readings.kind_of_meter", message))?;

        Ok(Reading {
            id,
            customer: customer.into_customer()?,
            date_of_reading,
            meter_id: self.meter_id.unwrap_or_default(),
            kind_of_meter,
            meter_count: self.meter_count.unwrap_or_default(),
            substitute: self.substitute.unwrap_or(false),
            comment: self.comment,
        })
    }
}
