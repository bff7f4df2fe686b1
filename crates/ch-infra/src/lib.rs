pub mod history;
pub mod imaging;
pub mod time;

pub use history::JsonHistoryRepository;
pub use imaging::ImageCrateProbe;
pub use time::SystemClock;
