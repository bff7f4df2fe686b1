use anyhow::{anyhow, Result};
use ch_core::clipboard::ClipboardRepresentation;
use ch_core::ports::SystemClipboardPort;
use ch_core::SystemClipboardSnapshot;
use clipboard_rs::ClipboardContext;
use std::sync::{Mutex, MutexGuard};
use tracing::debug_span;

use super::common;

/// System clipboard backed by `clipboard-rs`.
pub struct ClipboardRsClipboard {
    inner: Mutex<ClipboardContext>,
}

impl ClipboardRsClipboard {
    #[cfg(target_os = "linux")]
    pub fn new() -> Result<Self> {
        use clipboard_rs::ClipboardContextX11Options;

        let context =
            ClipboardContext::new_with_options(ClipboardContextX11Options { read_timeout: None })
                .map_err(|e| anyhow!("ClipboardContext::new_with_options failed: {e}"))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }

    #[cfg(not(target_os = "linux"))]
    pub fn new() -> Result<Self> {
        let context =
            ClipboardContext::new().map_err(|e| anyhow!("ClipboardContext::new failed: {e}"))?;
        Ok(Self {
            inner: Mutex::new(context),
        })
    }

    fn context(&self) -> Result<MutexGuard<'_, ClipboardContext>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("clipboard context lock poisoned"))
    }
}

impl SystemClipboardPort for ClipboardRsClipboard {
    fn read_snapshot(&self) -> Result<SystemClipboardSnapshot> {
        let span = debug_span!("platform.clipboard.read");
        let _enter = span.enter();
        let ctx = self.context()?;
        common::read_snapshot(&ctx)
    }

    fn write_representations(&self, representations: &[ClipboardRepresentation]) -> Result<()> {
        let span = debug_span!(
            "platform.clipboard.write",
            representations = representations.len()
        );
        let _enter = span.enter();
        let ctx = self.context()?;
        common::write_representations(&ctx, representations)
    }
}
