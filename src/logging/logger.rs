//! Dry-run aware logger.
use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Structured logger used by every command.
///
/// Messages are emitted as [`tracing`] events; the subscriber installed by
/// [`init_subscriber`](super::init_subscriber) renders them.
#[derive(Debug, Default)]
pub struct Logger {
    dry_run: bool,
}

impl Logger {
    /// Create a logger; `dry_run` selects how [`action`](Self::action)
    /// messages are rendered.
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Whether this run only previews changes.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (shown with `--verbose` only).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Log a change: as a dry-run message when previewing, as info otherwise.
    pub fn action(&self, msg: &str) {
        if self.dry_run {
            self.dry_run(msg);
        } else {
            self.info(msg);
        }
    }
}
