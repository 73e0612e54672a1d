use super::*;
use advice::{TextGenerator, UnavailableGenerator};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use storage::{FixedClock, MemorySlots, SlotBackend, SOCIAL_PROOF_BASELINE};

struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(format!("generated: {}", prompt.len()))
    }
}

struct ReadOnlySlots;

#[async_trait]
impl SlotBackend for ReadOnlySlots {
    async fn read_slot(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn write_slot(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage is read-only"))
    }
}

struct UnreadableSlots;

#[async_trait]
impl SlotBackend for UnreadableSlots {
    async fn read_slot(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("database is locked"))
    }

    async fn write_slot(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

fn setup_with(
    slots: Arc<dyn SlotBackend>,
    generator: Arc<dyn TextGenerator>,
    today: NaiveDate,
) -> ApiContext {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_date(today));
    ApiContext {
        store: SubscriberStore::new(slots, clock.clone()),
        advice: AdviceService::new(generator),
        clock,
    }
}

fn setup() -> ApiContext {
    setup_with(
        Arc::new(MemorySlots::new()),
        Arc::new(UnavailableGenerator),
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
    )
}

fn request(name: &str, phone: &str) -> SignupRequest {
    SignupRequest {
        name: name.into(),
        phone: phone.into(),
        category: BenefitCategory::OldAge,
    }
}

#[test]
fn phone_must_be_ten_digits_starting_with_zero() {
    assert_eq!(validate_phone(" 0821234567 "), Ok("0821234567".into()));
    for bad in ["821234567", "1821234567", "08212345678", "08212a4567", "", "+27821234567"] {
        assert_eq!(
            validate_phone(bad),
            Err(ValidationError::InvalidPhone(bad.into())),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn name_must_not_be_blank() {
    assert_eq!(validate_name("  Zanele "), Ok("Zanele".into()));
    assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
}

#[test]
fn pay_dates_follow_the_context_clock() {
    let ctx = setup_with(
        Arc::new(MemorySlots::new()),
        Arc::new(UnavailableGenerator),
        NaiveDate::from_ymd_opt(2024, 12, 10).expect("date"),
    );
    let dates = pay_dates(&ctx);
    assert_eq!(dates.len(), 4);
    assert_eq!(dates[0].date, "January 2, 2025");
}

#[tokio::test]
async fn invalid_phone_never_reaches_the_store() {
    let ctx = setup();
    let err = subscribe(&ctx, request("Sipho", "12345"))
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::Validation));
    assert!(ctx.store.list_subscribers().await.is_empty());
    assert_eq!(subscriber_count(&ctx).await, SOCIAL_PROOF_BASELINE);
}

#[tokio::test]
async fn signup_with_unavailable_generator_uses_fallbacks() {
    let ctx = setup();
    let confirmation = subscribe(&ctx, request(" Sipho ", "0821234567"))
        .await
        .expect("signup");

    assert_eq!(confirmation.subscriber.name, "Sipho");
    assert_eq!(confirmation.sms.sender, SMS_SENDER);
    assert!(confirmation.sms.message.contains("Sipho"));
    assert!(confirmation.sms.message.contains("Old Age Grant"));
    assert_eq!(confirmation.sms.timestamp.len(), 5);
    assert!(!confirmation.tip.is_empty());
    assert_eq!(confirmation.subscriber_count, SOCIAL_PROOF_BASELINE + 1);
}

#[tokio::test]
async fn signup_uses_generated_copy_when_available() {
    let ctx = setup_with(
        Arc::new(MemorySlots::new()),
        Arc::new(EchoGenerator),
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
    );
    let confirmation = subscribe(&ctx, request("Lindiwe", "0731234567"))
        .await
        .expect("signup");
    assert!(confirmation.sms.message.starts_with("generated: "));
    assert!(confirmation.tip.starts_with("generated: "));
}

#[tokio::test]
async fn storage_failure_becomes_try_again_notice() {
    let ctx = setup_with(
        Arc::new(ReadOnlySlots),
        Arc::new(UnavailableGenerator),
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
    );
    let err = subscribe(&ctx, request("Sipho", "0821234567"))
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::Storage));
    assert_eq!(err.message, TRY_AGAIN_NOTICE);
}

#[tokio::test]
async fn ask_advice_resolves_topics_by_label() {
    let ctx = setup();
    assert_eq!(advice_topics().len(), 4);
    let topic = find_topic("safe banking tips").expect("topic");
    assert_eq!(topic.category, BenefitCategory::OldAge);
    assert!(!ask_advice(&ctx, topic).await.is_empty());

    let err = find_topic("crypto").expect_err("unknown");
    assert!(matches!(err.code, ErrorCode::Validation));
}

#[tokio::test]
async fn unreadable_store_rejects_signup_with_try_again_notice() {
    let ctx = setup_with(
        Arc::new(UnreadableSlots),
        Arc::new(UnavailableGenerator),
        NaiveDate::from_ymd_opt(2024, 3, 10).expect("date"),
    );
    let err = subscribe(&ctx, request("Sipho", "0821234567"))
        .await
        .expect_err("should fail");
    assert!(matches!(err.code, ErrorCode::Storage));
    assert_eq!(err.message, TRY_AGAIN_NOTICE);
}
