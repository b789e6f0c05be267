//! Context propagation across `.await` points.

use std::{pin::Pin, task::Poll};

use pin_project::pin_project;

use crate::{Context, guard::ContextGuard};

/// An extension trait for futures that makes a [`Context`] current while they are polled.
pub trait FutureExt: Future + Sized {
    /// Enters `context` around every poll of this future.
    ///
    /// The context follows the future across threads, so it works with
    /// multi-threaded executors and spawned tasks.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxlog::{Context, FutureExt};
    ///
    /// let ctx = ctxlog::with(&Context::background(), [("user_id", "12345")]);
    /// let _task = async {
    ///     // Includes `user_id=12345`.
    ///     ctxlog::info(&Context::current(), "logging in", ());
    /// }
    /// .in_context(ctx);
    /// ```
    fn in_context(self, context: Context) -> ContextFuture<Self>;
}

impl<F> FutureExt for F
where
    F: Future,
{
    fn in_context(self, context: Context) -> ContextFuture<Self> {
        ContextFuture {
            inner: self,
            context,
        }
    }
}

/// A future that polls the inner future with a context entered.
#[pin_project]
#[derive(Debug)]
pub struct ContextFuture<F> {
    #[pin]
    inner: F,
    context: Context,
}

impl<F> Future for ContextFuture<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        let _guard = ContextGuard::enter(this.context.clone());
        this.inner.poll(cx)
    }
}
