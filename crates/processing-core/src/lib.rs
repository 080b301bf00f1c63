//! Flowsteer Processing Core
//!
//! Turns dense optical-flow fields into direction decisions:
//! - **Aggregation:** Reduce a motion field to its mean motion vector
//! - **Classification:** Map a motion vector to a direction label and folded angle
//! - **Tally:** Summarize the decisions made over a whole run
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod aggregate;
pub mod classify;
pub mod tally;

pub use aggregate::FlowAggregator;
pub use classify::DirectionClassifier;
pub use tally::DirectionTally;
