//! Port interfaces for the history engine.
//!
//! Ports define the contract between the core logic and the adapters in
//! `ch-infra` and `ch-platform`, so the engine can be exercised without an
//! OS clipboard or a filesystem.

mod app_dirs;
mod clipboard;
mod clock;
pub mod errors;
mod image_probe;
mod repository;

#[cfg(test)]
pub(crate) mod mocks;

pub use app_dirs::AppDirsPort;
pub use clipboard::SystemClipboardPort;
pub use clock::ClockPort;
pub use errors::AppDirsError;
pub use image_probe::ImageProbePort;
pub use repository::HistoryRepositoryPort;
