//! Timeline View Engine
//!
//! Computes a user's timeline on demand: pull the not-yet-seen posts from
//! every followee, merge them chronologically, hand the result to the
//! delivery sink. Nothing is materialized: there is no stored feed, and a
//! second view with no intervening posts returns nothing.

use super::merge::merge_chronological;
use super::sink::DeliverySink;
use crate::store::feed::FeedStore;
use crate::store::types::{Post, StoreError, UserId};

use std::sync::Arc;

/// The read path of the feed.
pub struct ViewEngine {
    store: Arc<FeedStore>,
    sink: Arc<dyn DeliverySink>,
}

impl ViewEngine {
    pub fn new(store: Arc<FeedStore>, sink: Arc<dyn DeliverySink>) -> Arc<Self> {
        Arc::new(Self { store, sink })
    }

    /// Computes and delivers the viewer's unseen timeline.
    ///
    /// The store gathers the per-followee batches and commits the cursors in
    /// one critical section; the merge runs outside the lock on the cloned
    /// batches. An empty result is the normal nothing-new outcome, not an
    /// error.
    pub async fn view(&self, viewer: UserId) -> Result<Vec<Post>, StoreError> {
        let batches = self.store.take_unseen(viewer).await?;

        let timeline = merge_chronological(batches);
        tracing::debug!("viewer {:?} gets {} new posts", viewer, timeline.len());

        self.sink.deliver(viewer, &timeline);
        Ok(timeline)
    }
}
