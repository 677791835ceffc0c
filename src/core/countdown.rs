use crate::core::SpecialOffer;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// 優惠倒數的剩餘時間
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    pub fn between(now: DateTime<Utc>, deadline: DateTime<Utc>) -> Self {
        let total = deadline.signed_duration_since(now).num_seconds();
        if total <= 0 {
            return Self::default();
        }

        Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

impl SpecialOffer {
    /// 沒有 validUntil 的優惠不顯示倒數
    pub fn time_left(&self, now: DateTime<Utc>) -> Option<TimeLeft> {
        self.deadline()
            .map(|deadline| TimeLeft::between(now, deadline))
    }
}
