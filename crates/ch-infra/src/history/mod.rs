//! On-disk history persistence.

mod json_repo;
mod record;

pub use json_repo::JsonHistoryRepository;
pub use record::HISTORY_FILE_VERSION;
