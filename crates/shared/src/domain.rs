use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Sender name shown on every outgoing SMS.
pub const SMS_SENDER: &str = "SassaAlert";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitCategory {
    OldAge,
    Disability,
    ChildSupport,
    Srd,
    FosterChild,
}

impl BenefitCategory {
    pub const ALL: [BenefitCategory; 5] = [
        BenefitCategory::OldAge,
        BenefitCategory::Disability,
        BenefitCategory::ChildSupport,
        BenefitCategory::Srd,
        BenefitCategory::FosterChild,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BenefitCategory::OldAge => "Old Age Grant",
            BenefitCategory::Disability => "Disability Grant",
            BenefitCategory::ChildSupport => "Child Support Grant",
            BenefitCategory::Srd => "Social Relief of Distress (SRD)",
            BenefitCategory::FosterChild => "Foster Child Grant",
        }
    }

    /// Wire token, matching the serde representation.
    pub fn token(self) -> &'static str {
        match self {
            BenefitCategory::OldAge => "OLD_AGE",
            BenefitCategory::Disability => "DISABILITY",
            BenefitCategory::ChildSupport => "CHILD_SUPPORT",
            BenefitCategory::Srd => "SRD",
            BenefitCategory::FosterChild => "FOSTER_CHILD",
        }
    }
}

impl fmt::Display for BenefitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BenefitCategory {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let needle = raw.trim();
        let normalized = needle.replace('-', "_").to_ascii_uppercase();
        BenefitCategory::ALL
            .into_iter()
            .find(|category| {
                category.token() == normalized || category.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ValidationError::UnknownCategory(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub String);

impl SubscriberId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRecord {
    pub id: SubscriberId,
    pub name: String,
    pub phone: String,
    pub category: BenefitCategory,
    pub subscribed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaydayEstimate {
    pub category: BenefitCategory,
    pub date: String,
    pub estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceTopic {
    pub label: &'static str,
    pub category: BenefitCategory,
}

pub const ADVICE_TOPICS: [AdviceTopic; 4] = [
    AdviceTopic {
        label: "Saving on Groceries",
        category: BenefitCategory::ChildSupport,
    },
    AdviceTopic {
        label: "Safe Banking Tips",
        category: BenefitCategory::OldAge,
    },
    AdviceTopic {
        label: "SRD Application Info",
        category: BenefitCategory::Srd,
    },
    AdviceTopic {
        label: "Budgeting for School",
        category: BenefitCategory::FosterChild,
    },
];

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
