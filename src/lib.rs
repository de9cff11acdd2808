//! Social Feed Read-Path Simulator Library
//!
//! This library crate defines the core modules of the feed simulation.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of four loosely coupled subsystems:
//!
//! - **`store`**: The single owner of user, post, and follow-edge state.
//!   Guards everything with one coarse lock and issues globally unique post
//!   timestamps and ids from inside that critical section.
//! - **`timeline`**: The read-path engine. Gathers each followee's posts
//!   newer than the per-edge cursor, merges them into one chronological
//!   timeline, and hands the result to a delivery sink. Feeds are computed
//!   on demand, never materialized.
//! - **`dispatch`**: The worker pool that drains the bounded request queue
//!   and routes post/view requests onto the store and engine.
//! - **`traffic`**: Boundary collaborators: population seeding and the
//!   simulated post/view request generators.

pub mod dispatch;
pub mod store;
pub mod timeline;
pub mod traffic;
