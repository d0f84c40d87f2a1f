// ==========================================
// SQLite 端到端导入测试
// ==========================================
// 测试目标: 真实数据库上的导入、重跑幂等、config_kv 覆写
// ==========================================


use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use shipment_import::config::{config_keys, ConfigManager};
use shipment_import::importer::{ShipmentImporter, ShipmentImporterImpl};
use shipment_import::logging;
use shipment_import::repository::SqliteImportStore;
use test_helpers::{create_test_db, test_config, write_csv_file, CsvBuilder};

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

fn sample_csv() -> String {
    CsvBuilder::standard()
        .shipment("SQ-1", "Jordan", "Iraq")
        .shipment("SQ-2", "Iraq", "Saudi Arabia")
        .shipment("SQ-3", "Saudi Arabia", "Jordan")
        .row(&[
            "SQ-4",
            "Lina",
            "Sami",
            "Jordan",
            "Egypt",
            "",
            "",
            "abc",
            "",
            "بطاقة",
            "Delivered",
            "Fragile, glass",
        ])
        .build()
}

#[tokio::test]
async fn test_sqlite_import_and_rerun_after_reopen() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let file = write_csv_file(&sample_csv());

    // 第一次导入
    {
        let store = SqliteImportStore::new(&db_path).unwrap();
        let importer = ShipmentImporterImpl::with_defaults(store, test_config());
        let report = importer.import_from_file(file.path()).await.unwrap();

        assert_eq!(report.total_rows, 4);
        assert_eq!(report.succeeded, 4);
        assert_eq!(report.failed, 0);
        assert_eq!(report.countries_created, 4);
    }

    // 重新打开数据库后再次导入
    {
        let store = SqliteImportStore::new(&db_path).unwrap();
        let importer = ShipmentImporterImpl::with_defaults(store, test_config());
        let report = importer.import_from_file(file.path()).await.unwrap();

        assert_eq!(report.succeeded, 0);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.countries_reused, 4);
    }

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count(&conn, "shipment"), 4);
    assert_eq!(count(&conn, "country"), 4);
    assert_eq!(count(&conn, "shipment_status"), 1);
    assert_eq!(count(&conn, "branch"), 1);
    assert_eq!(count(&conn, "app_user"), 1);

    let (weight, box_count, payment_method, payment_status, notes): (
        f64,
        i32,
        String,
        String,
        Option<String>,
    ) = conn
        .query_row(
            "SELECT weight, box_count, payment_method, payment_status, notes
             FROM shipment WHERE shipment_number = 'SQ-4'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )
        .unwrap();
    assert_eq!(weight, 0.0);
    assert_eq!(box_count, 1);
    assert_eq!(payment_method, "credit_card");
    assert_eq!(payment_status, "pending");
    assert_eq!(
        notes.as_deref(),
        Some("Fragile, glass\nLegacy status: Delivered")
    );
}

#[tokio::test]
async fn test_operator_created_with_bcrypt_hash() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let config = test_config();
    let store = SqliteImportStore::new(&db_path).unwrap();
    let importer = ShipmentImporterImpl::with_defaults(store, config.clone());

    importer.import_from_text(&sample_csv(), None).await.unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let (email, role, hash): (String, String, String) = conn
        .query_row(
            "SELECT email, role, password_hash FROM app_user LIMIT 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(email, config.default_operator_email);
    assert_eq!(role, "manager");
    assert_ne!(hash, config.default_operator_password);
    assert!(bcrypt::verify(&config.default_operator_password, &hash).unwrap());
}

#[tokio::test]
async fn test_config_kv_overrides_apply() {
    logging::init_test();

    let (_temp_db, db_path) = create_test_db().unwrap();
    let store = SqliteImportStore::new(&db_path).unwrap();

    let manager = ConfigManager::from_connection(store.connection());
    manager
        .set_config_value(config_keys::DELIVERY_OFFSET_DAYS, "3")
        .unwrap();
    manager
        .set_config_value(config_keys::DEFAULT_STATUS_NAME, "Legacy Import")
        .unwrap();
    manager
        .set_config_value(config_keys::PASSWORD_HASH_COST, "4")
        .unwrap();
    let config = manager.load_import_config().unwrap();
    assert_eq!(config.delivery_offset_days, 3);

    let importer = ShipmentImporterImpl::with_defaults(store, config);
    let csv = CsvBuilder::new(&["Shipment Title", "Origin", "Destination"])
        .row(&["CFG-1", "Jordan", "Iraq"])
        .build();
    importer.import_from_text(&csv, None).await.unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let (receiving, expected, status): (DateTime<Utc>, DateTime<Utc>, String) = conn
        .query_row(
            "SELECT s.receiving_date, s.expected_delivery_date, st.name
             FROM shipment s JOIN shipment_status st ON st.id = s.status_id
             WHERE s.shipment_number = 'CFG-1'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(expected - receiving, Duration::days(3));
    assert_eq!(status, "Legacy Import");
}
