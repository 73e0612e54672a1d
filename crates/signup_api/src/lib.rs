use std::sync::Arc;

use advice::AdviceService;
use chrono::Local;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{
        AdviceTopic, BenefitCategory, PaydayEstimate, SmsMessage, SubscriberRecord,
        ADVICE_TOPICS, SMS_SENDER,
    },
    error::{ApiError, ErrorCode, ValidationError},
    paydays::next_pay_dates,
};
use storage::{Clock, SubscriberStore};
use tracing::{error, info};

/// Generic notice shown when a signup cannot be completed.
pub const TRY_AGAIN_NOTICE: &str = "Something went wrong. Please try again.";

const PHONE_DIGITS: usize = 10;

#[derive(Clone)]
pub struct ApiContext {
    pub store: SubscriberStore,
    pub advice: AdviceService,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub phone: String,
    pub category: BenefitCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupConfirmation {
    pub subscriber: SubscriberRecord,
    pub sms: SmsMessage,
    pub tip: String,
    pub subscriber_count: u64,
}

/// Accepts local numbers of the form `0XXXXXXXXX`.
pub fn validate_phone(raw: &str) -> Result<String, ValidationError> {
    let phone = raw.trim();
    let well_formed = phone.len() == PHONE_DIGITS
        && phone.starts_with('0')
        && phone.bytes().all(|b| b.is_ascii_digit());
    if well_formed {
        Ok(phone.to_string())
    } else {
        Err(ValidationError::InvalidPhone(raw.to_string()))
    }
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

pub fn pay_dates(ctx: &ApiContext) -> Vec<PaydayEstimate> {
    next_pay_dates(ctx.clock.today())
}

pub async fn subscriber_count(ctx: &ApiContext) -> u64 {
    ctx.store.count_subscribers().await
}

pub async fn subscribe(
    ctx: &ApiContext,
    request: SignupRequest,
) -> Result<SignupConfirmation, ApiError> {
    let name = validate_name(&request.name)?;
    let phone = validate_phone(&request.phone)?;

    let subscriber = ctx
        .store
        .add_subscriber(&name, &phone, request.category)
        .await
        .map_err(|err| {
            error!(error = %err, "signup could not be stored");
            ApiError::new(ErrorCode::Storage, TRY_AGAIN_NOTICE)
        })?;

    let message = ctx
        .advice
        .generate_personalized_sms(&subscriber.name, subscriber.category)
        .await;
    let now = ctx.clock.now();
    let sms = SmsMessage {
        id: now.timestamp_millis().to_string(),
        sender: SMS_SENDER.to_string(),
        message,
        timestamp: now.with_timezone(&Local).format("%H:%M").to_string(),
    };

    let tip = ctx.advice.financial_tip(subscriber.category).await;
    let subscriber_count = ctx.store.count_subscribers().await;

    info!(
        subscriber_id = %subscriber.id,
        category = subscriber.category.token(),
        subscriber_count,
        "signup confirmed"
    );
    Ok(SignupConfirmation {
        subscriber,
        sms,
        tip,
        subscriber_count,
    })
}

pub fn advice_topics() -> &'static [AdviceTopic] {
    &ADVICE_TOPICS
}

/// Looks up a topic by its label, case-insensitively.
pub fn find_topic(label: &str) -> Result<AdviceTopic, ApiError> {
    ADVICE_TOPICS
        .iter()
        .copied()
        .find(|topic| topic.label.eq_ignore_ascii_case(label.trim()))
        .ok_or_else(|| ApiError::new(ErrorCode::Validation, format!("unknown topic '{label}'")))
}

pub async fn ask_advice(ctx: &ApiContext, topic: AdviceTopic) -> String {
    ctx.advice.financial_tip(topic.category).await
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
