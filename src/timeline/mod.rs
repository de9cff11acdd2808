//! Timeline Module
//!
//! The algorithmic core of the system: turning per-followee post logs into
//! one chronological, no-repeat timeline.
//!
//! ## Architecture Overview
//! A view is a **lazy fan-in**: nothing is pushed at post time; at view time
//! the engine asks the store for every followee's posts newer than that
//! edge's cursor, the store advances the cursors to exactly the newest post
//! it handed out, and the engine merges the batches by timestamp.
//!
//! ## Submodules
//! - **`engine`**: orchestrates gather -> merge -> deliver for one view call.
//! - **`merge`**: the k-way chronological merge.
//! - **`sink`**: the non-blocking delivery boundary (`NullSink`,
//!   `CaptureSink`).

pub mod engine;
pub mod merge;
pub mod sink;

#[cfg(test)]
mod tests;
