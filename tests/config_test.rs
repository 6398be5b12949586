// ==========================================
// 配置集成测试
// ==========================================
// 覆盖: config_kv 覆写 → ImportApi 预览行为
// ==========================================

use meter_import::api::ImportApi;
use meter_import::config::{config_keys, ConfigManager, ImportConfigReader};
use meter_import::db::{get_default_db_path, DB_PATH_ENV};
use meter_import::domain::DuplicateNamePolicy;
use meter_import::importer::messages;
use meter_import::logging;

mod test_helpers;
use test_helpers::{create_test_db, customer, seed_customers};

const READINGS: &str = "customerName,dateOfReading,meterId,kindOfMeter,meterCount,substitute,comment\n\
                        John Doe,2024-01-15,METER001,STROM,150.5,false,\n";

#[tokio::test]
async fn test_duplicate_name_policy_override_changes_preview() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let roster = vec![customer("John", "Doe"), customer("John", "Doe")];
    seed_customers(&db_path, &roster).await;

    let api = ImportApi::from_db_path(&db_path).unwrap();
    let rejected = api.preview_readings(READINGS).await.unwrap();
    assert_eq!(rejected.rejected_rows[0].errors, vec![messages::CUSTOMER_AMBIGUOUS]);

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::DUPLICATE_NAME_POLICY, "FIRST_MATCH")
        .unwrap();
    assert_eq!(
        config.get_duplicate_name_policy().await.unwrap(),
        DuplicateNamePolicy::FirstMatch
    );

    let accepted = api.preview_readings(READINGS).await.unwrap();
    assert_eq!(accepted.valid_rows[0].customer, roster[0]);
}

#[tokio::test]
async fn test_preview_row_limit_override() {
    let (_temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(config_keys::PREVIEW_ROW_LIMIT, "2")
        .unwrap();

    let api = ImportApi::from_db_path(&db_path).unwrap();
    let outcome = api
        .preview_customers(
            "firstName,lastName,birthDate,gender\n\
             A,A,1990-01-01,M\nB,B,1990-01-01,M\nC,C,1990-01-01,M\n",
        )
        .await
        .unwrap();

    assert_eq!(outcome.preview.len(), 2);
    assert_eq!(outcome.remaining_after_preview(), 1);
}

#[test]
fn test_db_path_env_override() {
    std::env::set_var(DB_PATH_ENV, "  /tmp/meter-import-test.db  ");
    let path = get_default_db_path();
    std::env::remove_var(DB_PATH_ENV);

    assert_eq!(path, "/tmp/meter-import-test.db");
}
