//! Traffic Module
//!
//! External collaborators from the engine's point of view: bulk setup of the
//! simulated population and the loops that produce post/view traffic. Only
//! their message contract (`dispatch::types::Request`) is load-bearing; the
//! scheduling policies here are stand-ins for real clients.

pub mod generator;
