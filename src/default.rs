//! The process-wide fallback logger.

use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;

use crate::Logger;

static DEFAULT_LOGGER: LazyLock<ArcSwap<Logger>> =
    LazyLock::new(|| ArcSwap::from_pointee(Logger::stderr()));

/// Replaces the logger used by contexts that carry no logger of their own.
///
/// The swap is atomic and visible to every lookup that starts after it returns.
/// A call that has already resolved the previous default keeps using it.
///
/// # Example
///
/// ```
/// use ctxlog::{Context, Logger};
///
/// ctxlog::set_default(Logger::new(env_logger::builder().build()).with([("service", "api")]));
/// ctxlog::info(&Context::background(), "started", ());
/// ```
pub fn set_default(logger: Logger) {
    DEFAULT_LOGGER.store(Arc::new(logger));
}

/// Returns the current default logger.
///
/// Before the first call to [`set_default`] this is [`Logger::stderr`].
#[must_use]
pub fn default_logger() -> Logger {
    Logger::clone(&DEFAULT_LOGGER.load())
}
