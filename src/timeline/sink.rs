//! Timeline Delivery Sink
//!
//! The boundary between the view engine and whatever consumes computed
//! timelines (in a real deployment: the client connection or a notification
//! system). Sinks must not block the engine.

use crate::store::types::{Post, UserId};

use dashmap::DashMap;

/// Receives the merged timeline of a single view call.
pub trait DeliverySink: Send + Sync {
    fn deliver(&self, viewer: UserId, timeline: &[Post]);
}

/// Production stand-in: drops every delivery.
pub struct NullSink;

impl DeliverySink for NullSink {
    fn deliver(&self, _viewer: UserId, _timeline: &[Post]) {}
}

/// Accumulates deliveries per viewer. Used by tests and the simulation
/// binary's final stats.
#[derive(Default)]
pub struct CaptureSink {
    delivered: DashMap<UserId, Vec<Post>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            delivered: DashMap::new(),
        }
    }

    /// Everything delivered to `viewer` so far, across all view calls.
    pub fn delivered_to(&self, viewer: UserId) -> Vec<Post> {
        self.delivered
            .get(&viewer)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Total number of delivered posts across all viewers.
    pub fn delivered_count(&self) -> usize {
        self.delivered
            .iter()
            .map(|entry| entry.value().len())
            .sum()
    }
}

impl DeliverySink for CaptureSink {
    fn deliver(&self, viewer: UserId, timeline: &[Post]) {
        if timeline.is_empty() {
            return;
        }
        self.delivered
            .entry(viewer)
            .or_default()
            .extend_from_slice(timeline);
    }
}
