//! cliphaven: a clipboard history daemon.
//!
//! The binary wires the engine from `ch-app` to the OS clipboard adapter and
//! the JSON history file, then polls until interrupted.

pub mod bootstrap;
pub mod cli;
