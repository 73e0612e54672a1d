use std::sync::Arc;

use chrono::NaiveDate;
use shared::domain::BenefitCategory;
use storage::{FixedClock, SqliteSlots, SubscriberStore, SOCIAL_PROOF_BASELINE};

#[tokio::test]
async fn subscribers_persist_across_store_instances() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("payday_alerts_acceptance_{suffix}"));
    let database_url = format!(
        "sqlite://{}",
        temp_root
            .join("alerts.db")
            .to_string_lossy()
            .replace('\\', "/")
    );
    let clock = Arc::new(FixedClock::at_date(
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
    ));

    let added = {
        let slots = SqliteSlots::new(&database_url).await.expect("db");
        let store = SubscriberStore::new(Arc::new(slots), clock.clone());
        let mut added = Vec::new();
        for (name, phone) in [("Amahle", "0821110000"), ("Bongani", "0832220000")] {
            added.push(
                store
                    .add_subscriber(name, phone, BenefitCategory::OldAge)
                    .await
                    .expect("add"),
            );
        }
        added
    };

    let slots = SqliteSlots::new(&database_url).await.expect("reopen db");
    let store = SubscriberStore::new(Arc::new(slots), clock);
    assert_eq!(store.list_subscribers().await, added);
    assert_eq!(store.count_subscribers().await, 2 + SOCIAL_PROOF_BASELINE);

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}
