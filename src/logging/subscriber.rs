//! Tracing subscriber setup: console formatter and initialisation.
use std::fmt;

use super::{DRY_RUN_TARGET, STAGE_TARGET};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits dotlink-style
/// console output.
struct DotlinkFormatter {
    ansi: bool,
}

impl DotlinkFormatter {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.ansi {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn line(&self, level: tracing::Level, target: &str, msg: &str) -> String {
        match level {
            tracing::Level::ERROR => format!("{} {msg}", self.paint("31", "ERROR")),
            tracing::Level::WARN => format!("{}  {msg}", self.paint("33", "WARN")),
            tracing::Level::INFO if target == STAGE_TARGET => {
                format!("{} {}", self.paint("1;34", "==>"), self.paint("1", msg))
            }
            tracing::Level::INFO if target == DRY_RUN_TARGET => {
                format!("  {} {msg}", self.paint("33", "[DRY RUN]"))
            }
            tracing::Level::INFO => format!("  {msg}"),
            _ => format!("  {}", self.paint("2", msg)),
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DotlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            self.line(*metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout.  Debug
/// events (including the linker's per-node decisions) are shown only when
/// `verbose` is set, unless `RUST_LOG` overrides the filter.  Colour is
/// disabled when `NO_COLOR` is set.
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let ansi = std::env::var_os("NO_COLOR").is_none();
    let console_layer = fmt::layer()
        .event_format(DotlinkFormatter { ansi })
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}

/// An event recorded by [`capture`].
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub level: tracing::Level,
    pub target: String,
    pub message: String,
}

/// Shared buffer of [`Captured`] events.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct Events(std::sync::Arc<std::sync::Mutex<Vec<Captured>>>);

#[cfg(test)]
impl Events {
    /// Drain the recorded events.
    #[allow(clippy::expect_used)]
    pub(crate) fn take(&self) -> Vec<Captured> {
        std::mem::take(&mut *self.0.lock().expect("events poisoned"))
    }
}

#[cfg(test)]
struct CaptureLayer(Events);

#[cfg(test)]
impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        if let Ok(mut events) = (self.0).0.lock() {
            events.push(Captured {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message: extractor.message,
            });
        }
    }
}

/// Record every event emitted on this thread while the guard is alive.
#[cfg(test)]
pub(crate) fn capture() -> (Events, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt as _;
    let events = Events::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (events, guard)
}
