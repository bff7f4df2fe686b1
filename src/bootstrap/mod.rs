//! Process bootstrap: configuration, tracing, dependency wiring and the
//! command entry points.

pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;
