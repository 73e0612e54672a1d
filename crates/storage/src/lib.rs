use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use shared::domain::{BenefitCategory, SubscriberId, SubscriberRecord};
use tracing::{info, warn};

mod clock;
mod slots;

pub use clock::{Clock, FixedClock, SystemClock};
pub use slots::{MemorySlots, SlotBackend, SqliteSlots};

/// Slot holding the serialized subscriber list.
pub const SUBSCRIBERS_SLOT: &str = "sassa_users_db";

/// Shown instead of the real count; added on top of it once anyone signs up.
pub const SOCIAL_PROOF_BASELINE: u64 = 15_420;

/// Simulated round-trip latency of a signup.
pub const SIGNUP_LATENCY: Duration = Duration::from_millis(1200);

/// Append-only subscriber list kept in a single slot.
///
/// Every mutation loads the whole list, appends, and writes the whole list
/// back. Records are never updated or removed.
#[derive(Clone)]
pub struct SubscriberStore {
    backend: Arc<dyn SlotBackend>,
    clock: Arc<dyn Clock>,
    slot_key: String,
}

impl SubscriberStore {
    pub fn new(backend: Arc<dyn SlotBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            slot_key: SUBSCRIBERS_SLOT.to_string(),
        }
    }

    pub fn with_slot_key(mut self, slot_key: impl Into<String>) -> Self {
        self.slot_key = slot_key.into();
        self
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Records a signup. Name and phone are stored as given.
    pub async fn add_subscriber(
        &self,
        name: &str,
        phone: &str,
        category: BenefitCategory,
    ) -> Result<SubscriberRecord> {
        self.clock.pause(SIGNUP_LATENCY).await;

        let record = SubscriberRecord {
            id: SubscriberId::generate(),
            name: name.to_string(),
            phone: phone.to_string(),
            category,
            subscribed_at: self.clock.now(),
        };

        let mut subscribers = self.load_for_append().await?;
        subscribers.push(record.clone());
        let encoded =
            serde_json::to_string(&subscribers).context("failed to encode subscriber list")?;
        self.backend
            .write_slot(&self.slot_key, &encoded)
            .await
            .context("failed to persist subscriber list")?;

        info!(
            subscriber_id = %record.id,
            category = record.category.token(),
            total = subscribers.len(),
            "subscriber added"
        );
        Ok(record)
    }

    /// Display count: the stored total plus [`SOCIAL_PROOF_BASELINE`], or the
    /// baseline alone while nothing is stored.
    pub async fn count_subscribers(&self) -> u64 {
        let stored = self.load().await.len() as u64;
        if stored > 0 {
            stored + SOCIAL_PROOF_BASELINE
        } else {
            SOCIAL_PROOF_BASELINE
        }
    }

    /// Stored records in insertion order.
    pub async fn list_subscribers(&self) -> Vec<SubscriberRecord> {
        self.load().await
    }

    // Absent, unreadable and corrupt slots all load as an empty list.
    async fn load(&self) -> Vec<SubscriberRecord> {
        match self.backend.read_slot(&self.slot_key).await {
            Ok(raw) => self.decode(raw),
            Err(error) => {
                warn!(slot = %self.slot_key, %error, "subscriber slot unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    // An unreadable slot must not be overwritten with a shorter list.
    async fn load_for_append(&self) -> Result<Vec<SubscriberRecord>> {
        let raw = self
            .backend
            .read_slot(&self.slot_key)
            .await
            .context("failed to load subscriber list")?;
        Ok(self.decode(raw))
    }

    fn decode(&self, raw: Option<String>) -> Vec<SubscriberRecord> {
        let Some(raw) = raw else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<SubscriberRecord>>(&raw) {
            Ok(subscribers) => subscribers,
            Err(error) => {
                warn!(slot = %self.slot_key, %error, "subscriber slot corrupt; treating as empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
