//! Monotonic Clock & Id Allocation
//!
//! Every post needs a strictly increasing timestamp and a sequential id.
//! `PostClock` owns both counters and lives inside the store's locked state,
//! so all increments happen inside the store's critical section and two
//! concurrent `append_post` calls can never tear them.

use super::types::{PostId, Timestamp};

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of globally unique post timestamps and sequential post ids.
#[derive(Debug, Default)]
pub struct PostClock {
    last_timestamp: Timestamp,
    next_post_id: u64,
}

impl PostClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: 0,
            next_post_id: 0,
        }
    }

    /// Returns a timestamp strictly greater than every previously issued
    /// value.
    ///
    /// The wall clock can return the same nanosecond twice (or step
    /// backwards); in that case the collision is resolved by bumping one
    /// past the last issued value. Self-corrected, never surfaced.
    pub fn next_timestamp(&mut self) -> Timestamp {
        let now = now_nanos();

        if now <= self.last_timestamp {
            tracing::trace!(
                "clock collision at {}, bumping past last issued value",
                self.last_timestamp
            );
            self.last_timestamp += 1;
        } else {
            self.last_timestamp = now;
        }

        self.last_timestamp
    }

    /// Allocates the next global post id.
    pub fn next_post_id(&mut self) -> PostId {
        let id = PostId(self.next_post_id);
        self.next_post_id += 1;
        id
    }

    /// The most recently issued timestamp.
    pub fn last_timestamp(&self) -> Timestamp {
        self.last_timestamp
    }
}

fn now_nanos() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as Timestamp
}
