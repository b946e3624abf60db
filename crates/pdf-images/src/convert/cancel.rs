//! Cancellation of in-flight conversions

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::options::ConversionOptions;
use crate::types::{ConversionOutcome, Result};

use super::{ProgressSender, convert};

/// Shared flag checked between images and before the document is written
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether both handles refer to the same token
    pub fn same_as(&self, other: &CancellationToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

/// Tracks the single active conversion.
///
/// Beginning a conversion cancels the one before it, so at most one token is
/// live at a time.
#[derive(Debug, Default)]
pub struct ConversionController {
    active: Mutex<Option<CancellationToken>>,
}

impl ConversionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token for a new conversion, cancelling the previous one
    pub fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.replace(token.clone()) {
            log::info!("Superseding the active conversion");
            previous.cancel();
        }
        token
    }

    /// Cancel the active conversion, if any
    pub fn cancel(&self) {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = active.as_ref() {
            log::info!("Cancelling the active conversion");
            token.cancel();
        }
    }

    /// Release `token` if it is still the active one
    pub fn finish(&self, token: &CancellationToken) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.as_ref().is_some_and(|current| current.same_as(token)) {
            *active = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Run a conversion as the active one
    pub async fn run(
        &self,
        files: &[PathBuf],
        options: &ConversionOptions,
        progress: Option<&ProgressSender>,
    ) -> Result<ConversionOutcome> {
        let token = self.begin();
        let result = convert(files, options, &token, progress).await;
        self.finish(&token);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        assert!(token.same_as(&clone));
        assert!(!token.same_as(&CancellationToken::new()));
    }

    #[test]
    fn test_begin_supersedes_previous() {
        let controller = ConversionController::new();
        let first = controller.begin();
        let second = controller.begin();

        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        controller.cancel();
        assert!(second.is_cancelled());
    }

    #[test]
    fn test_finish_only_clears_current_token() {
        let controller = ConversionController::new();
        let first = controller.begin();
        let second = controller.begin();

        controller.finish(&first);
        assert!(controller.is_active());

        controller.finish(&second);
        assert!(!controller.is_active());
    }
}
