use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::BenefitCategory;
use tracing::warn;

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig, GeminiError, DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(8);

const SMS_EMPTY_FALLBACK: &str = "You are now subscribed to SASSA Alerts.";
const TIP_EMPTY_FALLBACK: &str = "Keep your SASSA card safe and never share your PIN.";
const TIP_FAILURE_FALLBACK: &str = "Remember to keep your card safe and check balance via USSD.";

/// Free-text generation given a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generator used when no API key is configured; every call fails, so callers
/// always land on their fallback text.
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("text generation is not configured"))
    }
}

enum Generated {
    Text(String),
    Empty,
    Failed,
}

/// Personalised copy with deterministic fallbacks. One attempt per call,
/// bounded by `timeout`.
#[derive(Clone)]
pub struct AdviceService {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl AdviceService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn generate_personalized_sms(&self, name: &str, category: BenefitCategory) -> String {
        let prompt = format!(
            "Write a short, friendly SMS notification (max 160 chars) for a SASSA beneficiary named {name} who receives the {category}. \
             The SMS should confirm they have subscribed to payday alerts. \
             Use South African English slang or tone slightly if appropriate but keep it professional. \
             Do not include quotes in the output."
        );
        match self.attempt("sms", &prompt).await {
            Generated::Text(text) => text,
            Generated::Empty => SMS_EMPTY_FALLBACK.to_string(),
            Generated::Failed => sms_failure_fallback(name, category),
        }
    }

    pub async fn financial_tip(&self, category: BenefitCategory) -> String {
        let prompt = format!(
            "Provide a single, short, practical, and empathetic financial tip (max 2 sentences) specifically for someone in South Africa receiving the {category}. \
             Focus on stretching the rand, safety at ATMs, or grocery saving."
        );
        match self.attempt("tip", &prompt).await {
            Generated::Text(text) => text,
            Generated::Empty => TIP_EMPTY_FALLBACK.to_string(),
            Generated::Failed => TIP_FAILURE_FALLBACK.to_string(),
        }
    }

    async fn attempt(&self, kind: &'static str, prompt: &str) -> Generated {
        match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(Ok(text)) => {
                let text = clean_generated(&text);
                if text.is_empty() {
                    warn!(kind, "text generation returned empty output");
                    Generated::Empty
                } else {
                    Generated::Text(text)
                }
            }
            Ok(Err(error)) => {
                warn!(kind, %error, "text generation failed");
                Generated::Failed
            }
            Err(_) => {
                warn!(kind, timeout_ms = self.timeout.as_millis() as u64, "text generation timed out");
                Generated::Failed
            }
        }
    }
}

pub fn sms_failure_fallback(name: &str, category: BenefitCategory) -> String {
    format!("Hello {name}, you are confirmed for {category} alerts.")
}

fn clean_generated(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
