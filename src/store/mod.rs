//! Feed Data Store Module
//!
//! Owns all user, post, and follow-edge state behind a single coarse lock.
//!
//! ## Core Concepts
//! - **User table**: a linear table indexed by sequential `UserId`; users and
//!   follow edges are created during setup and immutable afterwards except
//!   for post/cursor growth.
//! - **Append-only post logs**: each user's posts are appended in creation
//!   order, which is timestamp order, so every log is always sorted.
//! - **Clock**: `PostClock` issues globally unique, strictly increasing
//!   timestamps and sequential post ids from inside the store's critical
//!   section.
//! - **Cursors**: per-follow-edge timestamps marking the newest post already
//!   delivered; the store commits them atomically during a view's gather
//!   phase.

pub mod clock;
pub mod feed;
pub mod types;
