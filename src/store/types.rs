use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Nanosecond UNIX timestamp. Globally unique across all posts: the clock
/// bumps past its last issued value on collision.
pub type Timestamp = i64;

/// Identifier of a user. Sequentially allocated; doubles as the index into
/// the store's user table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl UserId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier of a post. Monotonically increasing across the whole system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(pub u64);

/// A single post in a user's append-only log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub author: UserId,
    pub text: String,
    /// Opaque dedup hash of `text`. Exposed but not otherwise used.
    pub fingerprint: u64,
    pub timestamp: Timestamp,
    /// Deleted posts stay in the log and are filtered out at read time.
    pub deleted: bool,
}

/// A user record.
///
/// `cursors` is parallel to `following`: `cursors[i]` is the timestamp of
/// the newest post of `following[i]` already delivered to this user. The
/// `posts` log is append-only and timestamp-ascending because posts are
/// appended in creation order and creation order is timestamp order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Timestamp of this user's most recent non-deleted post. Zero until
    /// the first post.
    pub latest_timestamp: Timestamp,
    pub following: Vec<UserId>,
    pub cursors: Vec<Timestamp>,
    /// Fan-out bookkeeping only; delivery never walks this list.
    pub followers: Vec<UserId>,
    pub posts: Vec<Post>,
}

impl User {
    pub fn new(id: UserId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            latest_timestamp: 0,
            following: Vec::new(),
            cursors: Vec::new(),
            followers: Vec::new(),
            posts: Vec::new(),
        }
    }

    /// Non-deleted posts strictly newer than `ts`, ascending. Linear scan
    /// over the log; fine at this scale, a production store would index by
    /// timestamp.
    pub fn posts_after(&self, ts: Timestamp) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| post.timestamp > ts && !post.deleted)
            .cloned()
            .collect()
    }
}

/// Errors surfaced by store operations. Fatal to the single request, never
/// to the process: the dispatch loop logs them and moves on.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("unknown user id {0}")]
    UnknownUser(u64),
}

impl StoreError {
    pub fn unknown(id: UserId) -> Self {
        StoreError::UnknownUser(id.0)
    }
}
