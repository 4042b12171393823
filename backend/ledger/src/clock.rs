use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{Result, StoreError};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Korea Standard Time, the default civil offset for submissions.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn offset_from_hours(hours: i32) -> Result<FixedOffset> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or(StoreError::InvalidOffset(hours))
}

pub fn stamp(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format(TIME_FORMAT).to_string()
}
