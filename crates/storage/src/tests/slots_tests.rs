use super::*;

#[tokio::test]
async fn sqlite_slot_round_trips_and_overwrites() {
    let slots = SqliteSlots::new("sqlite::memory:").await.expect("db");
    assert_eq!(slots.read_slot("k").await.expect("read"), None);

    slots.write_slot("k", "first").await.expect("write");
    slots.write_slot("k", "second").await.expect("overwrite");
    assert_eq!(
        slots.read_slot("k").await.expect("read"),
        Some("second".to_string())
    );
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let slots = SqliteSlots::new("sqlite::memory:").await.expect("db");
    slots.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("payday_alerts_slots_test_{suffix}"));
    let db_path = temp_root.join("nested").join("slots.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let slots = SqliteSlots::new(&database_url).await.expect("db");
    slots.write_slot("k", "v").await.expect("write");
    drop(slots);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[tokio::test]
async fn memory_slots_keep_keys_apart() {
    let slots = MemorySlots::new();
    slots.write_slot("a", "1").await.expect("write");
    slots.put_raw("b", "2").await;
    assert_eq!(slots.read_slot("a").await.expect("read"), Some("1".into()));
    assert_eq!(slots.read_slot("b").await.expect("read"), Some("2".into()));
    assert_eq!(slots.read_slot("c").await.expect("read"), None);
}

#[test]
fn memory_urls_have_no_file_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(sqlite_path("sqlite:file:db?mode=memory&cache=shared"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/alerts.db"),
        Some(PathBuf::from("./data/alerts.db"))
    );
}
