//! Library surface of the `fogowatch` binary: configuration and the poll
//! cycle, exposed so integration tests can drive a cycle end to end.

pub mod config;
pub mod pipeline;

pub use config::Settings;
pub use pipeline::{run_cycle, CycleError, CycleReport};
