//! Console logging built on [`tracing`].
//!
//! Commands talk to a [`Logger`]; the subscriber installed by
//! [`init_subscriber`] decides how each event is rendered.

mod logger;
mod subscriber;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Tracing target for stage headers.
pub const STAGE_TARGET: &str = "dotlink::stage";

/// Tracing target for dry-run actions.
pub const DRY_RUN_TARGET: &str = "dotlink::dry_run";

#[cfg(test)]
pub(crate) use subscriber::capture;
