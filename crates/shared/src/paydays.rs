//! Estimated grant pay dates.
//!
//! Pay runs land early in the month, so once the 5th has passed the next
//! run shown is the following month's.

use chrono::{Datelike, Month, NaiveDate};

use crate::domain::{BenefitCategory, PaydayEstimate};

const ROLLOVER_AFTER_DAY: u32 = 5;

/// Fixed pay day per tracked category, in display order.
pub const PAY_DAYS: [(BenefitCategory, u32); 4] = [
    (BenefitCategory::OldAge, 2),
    (BenefitCategory::Disability, 3),
    (BenefitCategory::ChildSupport, 4),
    (BenefitCategory::Srd, 25),
];

pub fn next_pay_dates(today: NaiveDate) -> Vec<PaydayEstimate> {
    let (month, year) = target_month(today);
    let month_name = Month::try_from(month as u8)
        .map(|m| m.name())
        .unwrap_or("January");

    PAY_DAYS
        .iter()
        .map(|&(category, day)| PaydayEstimate {
            category,
            date: format!("{month_name} {day}, {year}"),
            estimated: true,
        })
        .collect()
}

/// Month (1-based) and year the next pay run falls in.
///
/// Only December advances the year; December on or before the 5th stays in
/// the current December.
pub fn target_month(today: NaiveDate) -> (u32, i32) {
    if today.day() <= ROLLOVER_AFTER_DAY {
        return (today.month(), today.year());
    }
    if today.month() == 12 {
        (1, today.year() + 1)
    } else {
        (today.month() + 1, today.year())
    }
}

#[cfg(test)]
#[path = "tests/paydays_tests.rs"]
mod tests;
