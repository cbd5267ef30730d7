// Log bridge - forwards `tracing` events into the report's step tree
//
// Every event at INFO or above becomes a step that opens and closes
// immediately, labelled `"{MM/DD/YYYY, HH:MM:SS} LOG ({LEVEL}): {message}"`.
// The bridge never fails the code that logged: reporter errors and panics
// are swallowed.

use crate::error::{Error, Result};
use crate::report::Reporter;
use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// Set once a bridge is the process-wide default subscriber.
static GLOBAL_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Timestamp format of bridged log steps
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

thread_local! {
    // Set while a bridged event is being written, so a reporter that logs
    // does not feed itself.
    static FORWARDING: Cell<bool> = const { Cell::new(false) };

    // Set while a `LogBridgeGuard` is alive on this thread.
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Formats the step label for one log record.
pub fn step_label(timestamp: &str, level: &Level, message: &str) -> String {
    format!("{} LOG ({}): {}", timestamp, level, message)
}

/// `tracing_subscriber` layer writing qualifying events to a [`Reporter`].
#[derive(Clone)]
pub struct ReportLayer {
    reporter: Arc<dyn Reporter>,
}

impl ReportLayer {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    fn forward(&self, label: &str) {
        let reporter = &self.reporter;
        // Ignored on purpose: logging must never take down its caller
        let _ = catch_unwind(AssertUnwindSafe(|| reporter.log_step(label)));
    }
}

impl<S: Subscriber> Layer<S> for ReportLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = event.metadata().level();
        // tracing orders levels by verbosity: DEBUG and TRACE sort above INFO
        if *level > Level::INFO {
            return;
        }
        if FORWARDING.with(|flag| flag.replace(true)) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.forward(&step_label(&timestamp, level, &visitor.finish()));

        FORWARDING.with(|flag| flag.set(false));
    }
}

impl fmt::Debug for ReportLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportLayer").finish_non_exhaustive()
    }
}

/// Collects the `message` field, then any other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}

/// Session-scoped attachment of the report layer.
///
/// ```ignore
/// let reporter = Arc::new(MemoryReporter::new());
/// let _guard = LogBridge::new(reporter.clone()).install()?;
/// tracing::info!("Navigated to registration page");
/// ```
pub struct LogBridge {
    reporter: Arc<dyn Reporter>,
}

impl LogBridge {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }

    /// The bridge as a layer, for callers that build their own subscriber.
    pub fn layer(&self) -> ReportLayer {
        ReportLayer::new(Arc::clone(&self.reporter))
    }

    /// Attaches the bridge (plus console output filtered by `RUST_LOG`) as
    /// the process-wide subscriber, for records from every thread.
    ///
    /// Stays attached for the rest of the process. A thread that holds a
    /// [`LogBridge::install`] guard reports to that bridge instead.
    ///
    /// # Errors
    ///
    /// [`Error::LogBridgeActive`] if a global bridge is already installed,
    /// [`Error::Report`] if another global subscriber was set first.
    pub fn install_global(&self) -> Result<()> {
        if GLOBAL_INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(Error::LogBridgeActive);
        }

        tracing::subscriber::set_global_default(self.subscriber()).map_err(|e| {
            GLOBAL_INSTALLED.store(false, Ordering::SeqCst);
            Error::Report(format!("could not install the log bridge: {}", e))
        })
    }

    /// Attaches the bridge (plus console output filtered by `RUST_LOG`) as
    /// this thread's default subscriber until the guard is dropped.
    ///
    /// Records from other threads do not reach it; use
    /// [`LogBridge::install_global`] when the work is spread over threads.
    ///
    /// # Errors
    ///
    /// [`Error::LogBridgeActive`] if a guard is already alive on this thread.
    pub fn install(&self) -> Result<LogBridgeGuard> {
        if INSTALLED.with(|flag| flag.replace(true)) {
            return Err(Error::LogBridgeActive);
        }

        Ok(LogBridgeGuard {
            _default: tracing::subscriber::set_default(self.subscriber()),
        })
    }

    fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        let console = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            );
        tracing_subscriber::registry()
            .with(self.layer().with_filter(LevelFilter::INFO))
            .with(console)
    }
}

impl fmt::Debug for LogBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBridge").finish_non_exhaustive()
    }
}

/// Detaches the bridge when dropped.
#[must_use = "the bridge detaches as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LogBridgeGuard {
    _default: tracing::subscriber::DefaultGuard,
}

impl Drop for LogBridgeGuard {
    fn drop(&mut self) {
        INSTALLED.with(|flag| flag.set(false));
    }
}
