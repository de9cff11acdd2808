//! Dispatch Worker Pool
//!
//! Drains the bounded request queue and routes each request to the store's
//! append path or the view engine. Each worker handles strictly one request
//! at a time; concurrency across workers is safe because the store
//! serializes conflicting accesses itself.
//!
//! ## Responsibilities
//! - **Routing**: `Post` -> `FeedStore::append_post`, `View` ->
//!   `ViewEngine::view`.
//! - **Isolation**: a failed request is logged and the loop moves on; one
//!   bad request never halts a worker or corrupts state for other users.
//! - **Shutdown**: when every producer has dropped its sender, the queue is
//!   drained to empty and the workers exit.

use super::types::Request;
use crate::store::feed::FeedStore;
use crate::timeline::engine::ViewEngine;

use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// The consume-dispatch loop over the shared request queue.
pub struct Dispatcher {
    store: Arc<FeedStore>,
    engine: Arc<ViewEngine>,
    /// Single receiver shared by all workers; each `recv` hands a request to
    /// exactly one of them.
    queue: Arc<Mutex<Receiver<Request>>>,
    worker_count: usize,
}

impl Dispatcher {
    /// Creates the dispatcher together with the bounded queue it will drain.
    ///
    /// The returned `Sender` is the producers' handle. The queue is bounded:
    /// a full queue blocks the sender, so backpressure lands on the
    /// generators and nothing is dropped silently.
    pub fn new(
        store: Arc<FeedStore>,
        engine: Arc<ViewEngine>,
        queue_capacity: usize,
        worker_count: usize,
    ) -> (Arc<Self>, Sender<Request>) {
        let (tx, rx) = mpsc::channel(queue_capacity);

        let dispatcher = Arc::new(Self {
            store,
            engine,
            queue: Arc::new(Mutex::new(rx)),
            worker_count,
        });

        (dispatcher, tx)
    }

    /// Spawns the worker tasks and returns their join handles.
    ///
    /// Awaiting the handles after dropping every sender gives a graceful
    /// shutdown: workers keep consuming until the queue is drained, then
    /// exit.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        tracing::info!("starting {} dispatch workers", self.worker_count);

        (0..self.worker_count)
            .map(|worker_id| {
                let dispatcher = self.clone();
                tokio::spawn(async move {
                    dispatcher.worker_loop(worker_id).await;
                })
            })
            .collect()
    }

    /// The main loop for a single worker: receive, route, repeat.
    async fn worker_loop(&self, worker_id: usize) {
        tracing::info!("worker {} started", worker_id);

        loop {
            // Hold the queue lock only for the receive itself, so other
            // workers can pick up requests while this one executes.
            let request = { self.queue.lock().await.recv().await };

            let Some(request) = request else {
                break;
            };

            self.handle(worker_id, request).await;
        }

        tracing::info!("worker {} drained the queue, shutting down", worker_id);
    }

    async fn handle(&self, worker_id: usize, request: Request) {
        match request {
            Request::Post { user, text } => match self.store.append_post(user, &text).await {
                Ok(post) => {
                    tracing::trace!(
                        "worker {} appended {:?} for {:?} at {}",
                        worker_id,
                        post.id,
                        user,
                        post.timestamp
                    );
                }
                Err(e) => {
                    tracing::warn!("worker {} failed post request: {}", worker_id, e);
                }
            },
            Request::View { user } => match self.engine.view(user).await {
                Ok(timeline) => {
                    tracing::trace!(
                        "worker {} delivered {} posts to {:?}",
                        worker_id,
                        timeline.len(),
                        user
                    );
                }
                Err(e) => {
                    tracing::warn!("worker {} failed view request: {}", worker_id, e);
                }
            },
        }
    }
}
