//! Creation timestamps.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Hands out creation timestamps that strictly increase per instance, even
/// when the wall clock stalls or steps backwards. Resolution is one
/// nanosecond, matching the epoch-nanosecond storage format.
#[derive(Debug, Default)]
pub struct CreationClock {
    last_nanos: AtomicI64,
}

impl CreationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let previous = self
            .last_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last.saturating_add(1)))
            })
            .unwrap_or(wall);
        DateTime::from_timestamp_nanos(wall.max(previous.saturating_add(1)))
    }
}
