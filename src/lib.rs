//! # Overview
//!
#![doc = include_utils::include_md!("README.md:description")]
//!
//! Structured logs are most useful when every record carries the data of the
//! operation it belongs to, such as a request id or a user name. This library
//! lets that data travel with an immutable [`Context`] instead of an explicit
//! logger argument:
//!
//! - Deriving a context with [`with`], [`with_attrs`] or [`with_group`] binds a
//!   decorated [`Logger`] to it; the parent context is never changed.
//! - Emitting with [`info`], [`log`](fn@log) and friends resolves the logger of the
//!   nearest ancestor, or the process-wide [default logger](default_logger).
//! - Contexts can be entered on a thread or attached to a future, so the plain
//!   [`log`](::log) macros pick them up through [`ContextLogger`].
//!
//! The library never formats or writes records itself. A [`Logger`] wraps any
//! implementation of the standard [`Log`](::log::Log) trait, such as
//! [`env_logger`], [`log4rs`] or [`structured-logger`].
//!
//! ## Basic example
//!
#![doc = include_utils::include_md!("README.md:basic_example")]
//!
//! ## Async Context Propagation
//!
#![doc = include_utils::include_md!("README.md:async_example")]
//!
//! [`log4rs`]: https://docs.rs/log4rs/latest/log4rs
//! [`structured-logger`]: https://docs.rs/structured-logger/latest/structured_logger

use std::borrow::Cow;

pub use ::log::Level;

pub use self::{
    attr::{Attr, KeyValues},
    bridge::ContextLogger,
    context::{Context, ContextKey},
    default::{default_logger, set_default},
    facade::{
        debug, enabled, error, info, log, log_attrs, logger, warn, with, with_attrs, with_group,
        with_logger,
    },
    future::{ContextFuture, FutureExt},
    guard::ContextGuard,
    logger::Logger,
    value::Value,
};

mod attr;
mod bridge;
mod context;
mod default;
mod facade;
pub mod future;
pub mod guard;
mod logger;
mod stack;
mod value;

type StaticCowStr = Cow<'static, str>;
