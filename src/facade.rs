//! Context-scoped logging functions.
//!
//! Every function resolves the effective logger of the given context (the
//! logger bound by the nearest [`with_logger`] or derivation, or the
//! [default logger](crate::default_logger)) and delegates to it.

use std::fmt;

use crate::{Attr, Context, ContextKey, KeyValues, Level, Logger, default_logger};

/// The context slot holding the bound logger. Private, so nothing outside this
/// module can read or overwrite it.
struct LoggerSlot;

impl ContextKey for LoggerSlot {
    type Value = Logger;
}

/// Returns a context that uses `logger` for itself and its descendants.
#[must_use]
pub fn with_logger(ctx: &Context, logger: Logger) -> Context {
    ctx.with_value::<LoggerSlot>(logger)
}

/// Returns the effective logger of the context.
#[must_use]
pub fn logger(ctx: &Context) -> Logger {
    ctx.value::<LoggerSlot>()
        .cloned()
        .unwrap_or_else(default_logger)
}

/// Reports whether the effective logger emits records at the given level.
///
/// Use it to skip building expensive attributes:
///
/// ```
/// use ctxlog::{Context, Level};
///
/// let ctx = Context::background();
/// if ctxlog::enabled(&ctx, Level::Debug) {
///     ctxlog::debug(&ctx, "state", [("dump", format!("{:?}", vec![0_u8; 16]))]);
/// }
/// ```
#[must_use]
pub fn enabled(ctx: &Context, level: Level) -> bool {
    logger(ctx).enabled(level)
}

/// Logs at [`Level::Debug`].
#[track_caller]
pub fn debug(ctx: &Context, msg: impl fmt::Display, kvs: impl KeyValues) {
    logger(ctx).log(Level::Debug, msg, kvs);
}

/// Logs at [`Level::Info`].
#[track_caller]
pub fn info(ctx: &Context, msg: impl fmt::Display, kvs: impl KeyValues) {
    logger(ctx).log(Level::Info, msg, kvs);
}

/// Logs at [`Level::Warn`].
#[track_caller]
pub fn warn(ctx: &Context, msg: impl fmt::Display, kvs: impl KeyValues) {
    logger(ctx).log(Level::Warn, msg, kvs);
}

/// Logs at [`Level::Error`].
#[track_caller]
pub fn error(ctx: &Context, msg: impl fmt::Display, kvs: impl KeyValues) {
    logger(ctx).log(Level::Error, msg, kvs);
}

/// Emits a record with the given level and message.
#[track_caller]
pub fn log(ctx: &Context, level: Level, msg: impl fmt::Display, kvs: impl KeyValues) {
    logger(ctx).log(level, msg, kvs);
}

/// A version of [`log`] that borrows ready attributes.
#[track_caller]
pub fn log_attrs(ctx: &Context, level: Level, msg: impl fmt::Display, attrs: &[Attr]) {
    logger(ctx).log_attrs(level, msg, attrs);
}

/// Returns a context whose logger qualifies the keys of all attributes added
/// later with the given group name.
#[must_use]
pub fn with_group(ctx: &Context, group: impl Into<crate::StaticCowStr>) -> Context {
    let logger = logger(ctx).with_group(group);
    with_logger(ctx, logger)
}

/// Returns a context that includes the given attributes in each record.
#[must_use]
pub fn with_attrs(ctx: &Context, attrs: impl IntoIterator<Item = Attr>) -> Context {
    let logger = logger(ctx).with_attrs(attrs);
    with_logger(ctx, logger)
}

/// Returns a context that includes the given key/value pairs in each record.
///
/// # Example
///
/// ```
/// use ctxlog::Context;
///
/// let ctx = ctxlog::with(&Context::background(), [("request_id", "req-123")]);
/// let ctx = ctxlog::with(&ctx, (("user", "john"), ("attempt", 2)));
///
/// // Includes request_id, user and attempt.
/// ctxlog::info(&ctx, "processing request", ());
/// ```
#[must_use]
pub fn with(ctx: &Context, kvs: impl KeyValues) -> Context {
    let logger = logger(ctx).with(kvs);
    with_logger(ctx, logger)
}
