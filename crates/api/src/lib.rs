//! Refshoot API server library.
//!
//! Exposes config, state, error handling, the router and the generation
//! engine so integration tests and the binary entrypoint share them.

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
