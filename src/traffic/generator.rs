//! Traffic Generators & Setup
//!
//! Boundary collaborators of the engine: they only decide who posts or views
//! and when, and push `Request`s onto the bounded queue. A full queue blocks
//! them; tolerating backpressure is their side of the contract.

use crate::dispatch::types::Request;
use crate::store::feed::FeedStore;
use crate::store::types::{StoreError, UserId};

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;

/// Phrases the poster cycles through.
const PHRASES: [&str; 4] = [
    "first post of the day",
    "look at this",
    "another one",
    "still at it",
];

/// Creates `count` plain users and returns their ids, in creation order.
pub async fn seed_users(store: &Arc<FeedStore>, count: usize) -> Vec<UserId> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        ids.push(store.create_user(&format!("user{}", i)).await);
    }
    tracing::info!("seeded {} plain users", count);
    ids
}

/// Creates one high-follower "star" user pre-wired with the given followers.
pub async fn seed_star(
    store: &Arc<FeedStore>,
    name: &str,
    followers: &[UserId],
) -> Result<UserId, StoreError> {
    let star = store.create_user(name).await;
    for follower in followers {
        store.follow(*follower, star).await?;
    }
    tracing::info!("seeded star {} with {} followers", name, followers.len());
    Ok(star)
}

/// Enqueues a post from each author every `interval`, cycling the phrase
/// list. Exits when the queue closes.
pub async fn poster_loop(tx: Sender<Request>, authors: Vec<UserId>, interval: Duration) {
    let mut phrase = 0usize;

    loop {
        for author in &authors {
            let request = Request::Post {
                user: *author,
                text: PHRASES[phrase % PHRASES.len()].to_string(),
            };
            phrase += 1;

            if tx.send(request).await.is_err() {
                tracing::debug!("poster stopping, queue closed");
                return;
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// Enqueues two views every `interval`: one for a random user, one
/// round-robin over the whole population. Exits when the queue closes.
pub async fn viewer_loop(tx: Sender<Request>, user_count: u64, interval: Duration) {
    if user_count == 0 {
        return;
    }

    let mut next = 0u64;

    loop {
        let random = UserId(rand::thread_rng().gen_range(0..user_count));
        if tx.send(Request::View { user: random }).await.is_err() {
            break;
        }

        let round_robin = UserId(next);
        next = (next + 1) % user_count;
        if tx.send(Request::View { user: round_robin }).await.is_err() {
            break;
        }

        tokio::time::sleep(interval).await;
    }

    tracing::debug!("viewer stopping, queue closed");
}
