//! In-Memory Feed Store
//!
//! Exclusive owner of all user, post, and follow-edge state, and the single
//! point of mutual exclusion in the system. Every operation takes one coarse
//! lock for its whole duration, so a concurrent `follow` and `append_post`
//! on different users never interleave partially.
//!
//! This is a deliberate simplification for simulation scale: one global
//! critical section over a linear user table. A production store would shard
//! the lock and index posts by timestamp per user.

use super::clock::PostClock;
use super::types::{Post, PostId, StoreError, Timestamp, User, UserId};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The shared data store. Cheap to clone via `Arc`.
pub struct FeedStore {
    inner: Mutex<StoreInner>,
}

/// Everything the store lock guards: the user table and the global
/// timestamp/id counters.
struct StoreInner {
    users: Vec<User>,
    clock: PostClock,
}

impl StoreInner {
    fn user(&self, id: UserId) -> Result<&User, StoreError> {
        self.users.get(id.index()).ok_or_else(|| StoreError::unknown(id))
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut User, StoreError> {
        self.users
            .get_mut(id.index())
            .ok_or_else(|| StoreError::unknown(id))
    }
}

impl FeedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StoreInner {
                users: Vec::new(),
                clock: PostClock::new(),
            }),
        })
    }

    /// Allocates the next user id and appends an empty user record.
    /// Never fails.
    pub async fn create_user(&self, name: &str) -> UserId {
        let mut inner = self.inner.lock().await;

        let id = UserId(inner.users.len() as u64);
        inner.users.push(User::new(id, name));

        tracing::debug!("created user {} ({:?})", name, id);
        id
    }

    /// Creates a follow edge from `follower` to `followee`.
    ///
    /// Appends to the follower's `following`/`cursors` (cursor initialized
    /// to the followee's current `latest_timestamp`, so only posts made
    /// after the follow are delivered) and to the followee's `followers`.
    ///
    /// Idempotent: a repeated follow is a logged no-op, as is a self-follow.
    pub async fn follow(&self, follower: UserId, followee: UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;

        // Validate both ends before mutating either.
        inner.user(follower)?;
        let followee_ts = inner.user(followee)?.latest_timestamp;

        if follower == followee {
            tracing::debug!("ignoring self-follow from {:?}", follower);
            return Ok(());
        }

        if inner.user(follower)?.following.contains(&followee) {
            tracing::debug!("{:?} already follows {:?}, ignoring", follower, followee);
            return Ok(());
        }

        {
            let f = inner.user_mut(follower)?;
            f.following.push(followee);
            f.cursors.push(followee_ts);
        }
        inner.user_mut(followee)?.followers.push(follower);

        tracing::debug!("{:?} now follows {:?}", follower, followee);
        Ok(())
    }

    /// Cloned read view of a user record.
    pub async fn get_user(&self, id: UserId) -> Result<User, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.user(id)?.clone())
    }

    /// Non-deleted posts of `user` strictly newer than `ts`, ascending.
    pub async fn posts_after(&self, user: UserId, ts: Timestamp) -> Result<Vec<Post>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.user(user)?.posts_after(ts))
    }

    /// Appends a new post to the author's log.
    ///
    /// Obtains the next global timestamp and post id, computes the text
    /// fingerprint, appends, and only then bumps the author's
    /// `latest_timestamp`, all under the one store lock, so a concurrent
    /// view reads either the pre- or post-append snapshot, never a torn one.
    pub async fn append_post(&self, author: UserId, text: &str) -> Result<Post, StoreError> {
        let mut inner = self.inner.lock().await;

        // Validate before consuming the clock.
        inner.user(author)?;

        let timestamp = inner.clock.next_timestamp();
        let id = inner.clock.next_post_id();
        let post = Post {
            id,
            author,
            text: text.to_string(),
            fingerprint: fingerprint(text),
            timestamp,
            deleted: false,
        };

        let user = inner.user_mut(author)?;
        user.posts.push(post.clone());
        user.latest_timestamp = timestamp;

        tracing::trace!("{:?} posted {:?} at {}", author, id, timestamp);
        Ok(post)
    }

    /// Gathers each followee's not-yet-seen posts and commits the viewer's
    /// cursors, atomically.
    ///
    /// For each followee: skip if `latest_timestamp` equals the cursor (the
    /// O(1) nothing-changed short-circuit), otherwise scan for newer
    /// non-deleted posts and advance the cursor to the newest delivered
    /// timestamp. The cursor commits here, before any caller consumes the
    /// merged result, so a post is never delivered twice.
    ///
    /// Returned batches are individually non-empty and timestamp-ascending;
    /// the chronological merge across them happens outside the lock.
    pub async fn take_unseen(&self, viewer: UserId) -> Result<Vec<Vec<Post>>, StoreError> {
        let mut inner = self.inner.lock().await;

        let (following, cursors) = {
            let v = inner.user(viewer)?;
            (v.following.clone(), v.cursors.clone())
        };

        let mut batches = Vec::new();
        let mut new_cursors = cursors.clone();

        for (i, followee) in following.iter().enumerate() {
            let f = match inner.user(*followee) {
                Ok(f) => f,
                Err(e) => {
                    // Partial timelines are acceptable; aborting the whole
                    // view is not.
                    tracing::warn!("skipping unresolved followee of {:?}: {}", viewer, e);
                    continue;
                }
            };

            if f.latest_timestamp == cursors[i] {
                continue;
            }

            let posts = f.posts_after(cursors[i]);
            if posts.is_empty() {
                // Every newer post is deleted. Leave the cursor alone and
                // rescan next time.
                continue;
            }

            new_cursors[i] = posts[posts.len() - 1].timestamp;
            batches.push(posts);
        }

        inner.user_mut(viewer)?.cursors = new_cursors;
        Ok(batches)
    }

    /// Flags a post deleted. The post stays in the author's log; it is
    /// filtered out of every subsequent read.
    pub async fn mark_deleted(&self, author: UserId, post: PostId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;

        let user = inner.user_mut(author)?;
        for p in user.posts.iter_mut() {
            if p.id == post {
                p.deleted = true;
                tracing::debug!("marked {:?} of {:?} deleted", post, author);
                return Ok(());
            }
        }

        // Unknown post id on a valid author: nothing to flag.
        tracing::debug!("no {:?} in the log of {:?}", post, author);
        Ok(())
    }

    /// Total number of users.
    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    /// Total number of posts across all users, deleted ones included.
    pub async fn post_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .users
            .iter()
            .map(|user| user.posts.len())
            .sum()
    }
}

/// Opaque dedup fingerprint of a post's text.
pub fn fingerprint(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}
