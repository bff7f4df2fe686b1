//! `mockall` doubles for the core ports.

use mockall::mock;

use crate::clipboard::{ClipboardRepresentation, SystemClipboardSnapshot};
use crate::history::ClipboardEntry;
use crate::ports::{ClockPort, HistoryRepositoryPort, ImageProbePort, SystemClipboardPort};

mock! {
    pub Clipboard {}

    impl SystemClipboardPort for Clipboard {
        fn read_snapshot(&self) -> anyhow::Result<SystemClipboardSnapshot>;
        fn write_representations(
            &self,
            representations: &[ClipboardRepresentation],
        ) -> anyhow::Result<()>;
    }
}

mock! {
    pub Repo {}

    impl HistoryRepositoryPort for Repo {
        fn load(&self) -> anyhow::Result<Vec<ClipboardEntry>>;
        fn save(&self, entries: &[ClipboardEntry]) -> anyhow::Result<()>;
    }
}

mock! {
    pub ImageProbe {}

    impl ImageProbePort for ImageProbe {
        fn dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)>;
    }
}

/// Hand-driven clock for timing-sensitive tests.
#[derive(Debug, Default)]
pub struct ManualClock(std::sync::atomic::AtomicI64);

impl ManualClock {
    pub fn at(ms: i64) -> Self {
        Self(std::sync::atomic::AtomicI64::new(ms))
    }

    pub fn advance(&self, ms: i64) {
        self.0.fetch_add(ms, std::sync::atomic::Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> i64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}
