// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use meter_import::db::{ensure_schema, open_sqlite_connection};
use meter_import::repository::{CustomerRepository, CustomerRepositoryImpl};
use meter_import::{Customer, Gender};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use uuid::Uuid;

pub const CUSTOMERS_FIXTURE: &str = "tests/fixtures/datasets/customers_mixed.csv";
pub const READINGS_FIXTURE: &str = "tests/fixtures/datasets/readings_mixed.csv";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 在临时目录写入 CSV 文件
pub fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

/// 构造客户（新 UUID）
pub fn customer(first_name: &str, last_name: &str) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
        gender: Gender::M,
    }
}

/// 花名册: John Doe, Jane Smith
pub fn default_roster() -> Vec<Customer> {
    vec![customer("John", "Doe"), customer("Jane", "Smith")]
}

/// 将客户写入测试库
pub async fn seed_customers(db_path: &str, customers: &[Customer]) {
    let repo = CustomerRepositoryImpl::new(db_path).unwrap();
    for c in customers {
        repo.create(c).await.unwrap();
    }
}
