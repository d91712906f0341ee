//! Refshoot core: pure logic for turning a picked folder of reference
//! images into a generation job.
//!
//! Pipeline: [`validation`] → [`grouping`] → [`mapping`] → [`job`] →
//! [`prompt`]. [`selection`] and [`dispatch`] cover what happens between a
//! built job and the generation backend. Nothing in this crate performs
//! I/O.

pub mod dispatch;
pub mod error;
pub mod grouping;
pub mod job;
pub mod mapping;
pub mod naming;
pub mod prompt;
pub mod roles;
pub mod selection;
pub mod validation;
