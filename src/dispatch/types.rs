use crate::store::types::UserId;
use serde::{Deserialize, Serialize};

/// A single unit of traffic, enqueued by a generator and consumed by a
/// dispatch worker.
///
/// This is the whole contract with the traffic generators: they only decide
/// who posts or views and when, never how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    /// Append a post to `user`'s log.
    Post { user: UserId, text: String },
    /// Compute and deliver `user`'s unseen timeline.
    View { user: UserId },
}
