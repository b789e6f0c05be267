//! An immutable, hierarchical execution context.

use std::{any::Any, any::TypeId, fmt, sync::Arc};

use crate::{guard::ContextGuard, stack::CONTEXT_STACK};

/// A typed key for a [`Context`] slot.
///
/// The key is the implementing type itself, so a private key type can only be
/// read or written by the module that defines it. Two keys never collide even if
/// they store the same value type.
///
/// # Examples
///
/// ```
/// use ctxlog::{Context, ContextKey};
///
/// struct RequestId;
///
/// impl ContextKey for RequestId {
///     type Value = u64;
/// }
///
/// let ctx = Context::background().with_value::<RequestId>(42);
/// assert_eq!(ctx.value::<RequestId>(), Some(&42));
/// ```
pub trait ContextKey: 'static {
    /// The type of the value stored under this key.
    type Value: Send + Sync + 'static;
}

/// An immutable chain of key/value slots.
///
/// Deriving a context never alters the original one or any other context
/// derived from the same parent. Cloning is a reference count bump.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

struct Node {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

impl Context {
    /// Returns an empty root context.
    #[must_use]
    pub const fn background() -> Self {
        Self { head: None }
    }

    /// Returns the context entered on the current thread, or an empty one.
    ///
    /// See [`Context::enter`] and [`FutureExt::in_context`](crate::FutureExt::in_context).
    #[must_use]
    pub fn current() -> Self {
        CONTEXT_STACK
            .try_with(|stack| stack.top())
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Returns a child context in which `K` holds `value`.
    #[must_use]
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        let node = Node {
            key: TypeId::of::<K>(),
            value: Box::new(value),
            parent: self.head.clone(),
        };
        Self {
            head: Some(Arc::new(node)),
        }
    }

    /// Looks up the value of `K` in this context or its nearest ancestor.
    #[must_use]
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let key = TypeId::of::<K>();
        self.nodes()
            .find(|node| node.key == key)
            .and_then(|node| node.value.downcast_ref())
    }

    /// Returns the number of slots in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Makes this context current on the calling thread until the guard is dropped.
    ///
    /// Records emitted through the [`log`] macros pick up the logger of the
    /// current context once [`ContextLogger`](crate::ContextLogger) is installed.
    #[must_use]
    pub fn enter<'a>(&self) -> ContextGuard<'a> {
        ContextGuard::enter(self.clone())
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}
