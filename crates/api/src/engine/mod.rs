//! Generation engine.
//!
//! [`dispatcher`] runs a planned batch of reference edits against the
//! image provider with bounded concurrency.

pub mod dispatcher;
