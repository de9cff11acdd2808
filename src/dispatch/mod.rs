//! Request Dispatch Module
//!
//! The serialization point between concurrent traffic producers and the
//! engines.
//!
//! ## Architecture Overview
//! Generators enqueue `Request`s onto one bounded mpsc channel; a pool of
//! workers drains it, one request at a time per worker. The queue being
//! bounded pushes backpressure onto the producers; the loop itself never
//! drops a request. Closing every sender drains the queue and stops the
//! pool.
//!
//! ## Submodules
//! - **`types`**: the `Request` message contract.
//! - **`worker`**: the `Dispatcher` and its worker loops.

pub mod types;
pub mod worker;
