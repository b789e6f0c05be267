//! A current context guard.

use std::marker::PhantomData;

use crate::{
    Context,
    stack::{CONTEXT_STACK, ContextStack},
};

/// A guard representing the current context in the per-thread context stack.
///
/// When the guard is dropped, the context is removed from the stack.
/// This is returned by the [`Context::enter`] method.
///
/// # Examples
///
/// ```
/// use ctxlog::Context;
///
/// let ctx = ctxlog::with(&Context::background(), [("user_id", 123)]);
///
/// let guard = ctx.enter();
/// assert_eq!(Context::current().depth(), ctx.depth());
///
/// drop(guard);
/// assert_eq!(Context::current().depth(), 0);
/// ```
#[non_exhaustive]
#[derive(Debug)]
pub struct ContextGuard<'a> {
    // Whether the context was pushed; false once the stack is torn down.
    entered: bool,
    // Make this guard unsendable.
    _marker: PhantomData<&'a *mut ()>,
}

impl ContextGuard<'_> {
    pub(crate) fn enter(context: Context) -> Self {
        let entered = CONTEXT_STACK
            .try_with(|stack| stack.push(context))
            .is_ok();
        Self {
            entered,
            _marker: PhantomData,
        }
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        if self.entered {
            let _ = CONTEXT_STACK.try_with(ContextStack::pop);
        }
    }
}
