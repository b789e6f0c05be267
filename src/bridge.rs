//! Integration with the [`log`] macros.

use crate::{Logger, default_logger, stack::CONTEXT_STACK};

/// A [`log::Log`] implementation that routes records to the logger of the
/// current context.
///
/// Once installed, `log::info!` and friends behave like [`info`](crate::info)
/// called with [`Context::current()`](crate::Context::current): records pick up the attributes and groups
/// of the entered context, and fall back to the [default logger](crate::default_logger).
///
/// # Example
///
/// ```
/// use ctxlog::{Context, ContextLogger, Logger};
/// use log::LevelFilter;
///
/// ctxlog::set_default(Logger::new(env_logger::builder().build()));
/// ContextLogger::new().init(LevelFilter::Info);
///
/// let ctx = ctxlog::with(&Context::background(), [("request_id", "req-123")]);
/// let _guard = ctx.enter();
/// log::info!("Processing request"); // Includes request_id.
/// ```
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ContextLogger;

impl ContextLogger {
    /// Creates a new [`ContextLogger`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Initializes the global logger with the context logger.
    ///
    /// This should be called early in the execution of a Rust program. Any log events that occur before initialization will be ignored.
    ///
    /// # Panics
    ///
    /// Panics if a logger has already been set.
    pub fn init(self, max_level: log::LevelFilter) {
        self.try_init(max_level)
            .expect("ContextLogger::init should not be called after logger initialization");
    }

    /// Initializes the global logger with the context logger.
    ///
    /// This should be called early in the execution of a Rust program. Any log events that occur before initialization will be ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a logger has already been set.
    pub fn try_init(self, max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_max_level(max_level);
        log::set_boxed_logger(Box::new(self))
    }
}

fn current_logger() -> Logger {
    match CONTEXT_STACK.try_with(|stack| stack.top()) {
        Ok(context) => crate::logger(&context.unwrap_or_default()),
        Err(err) => {
            // We can't use `log::error!` here because we are in the middle of logging and
            // this invocation becomes recursive.
            eprintln!("Error accessing context stack: {err}");
            default_logger()
        }
    }
}

impl log::Log for ContextLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        current_logger().enabled_for(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        current_logger().log_record(record);
    }

    fn flush(&self) {
        current_logger().flush();
    }
}
