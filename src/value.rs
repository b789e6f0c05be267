use std::{borrow::Cow, fmt, sync::Arc, time::Duration};

use crate::{Attr, StaticCowStr};

/// The value of an [`Attr`].
///
/// Values are cheap to clone: dynamic payloads are shared behind an [`Arc`], so a
/// value bound to a logger can be reused by every logger derived from it.
#[derive(Clone)]
pub struct Value(pub(crate) ValueInner);

#[derive(Clone)]
pub(crate) enum ValueInner {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(StaticCowStr),
    Duration(Duration),
    Debug(Arc<dyn fmt::Debug + Send + Sync + 'static>),
    Display(Arc<dyn fmt::Display + Send + Sync + 'static>),
    Error(Arc<dyn std::error::Error + Send + Sync + 'static>),
    Serde(Arc<dyn erased_serde::Serialize + Send + Sync + 'static>),
    Group(Vec<Attr>),
}

impl From<ValueInner> for Value {
    fn from(inner: ValueInner) -> Self {
        Self(inner)
    }
}

impl Value {
    /// Creates an empty value.
    #[must_use]
    pub const fn null() -> Self {
        Self(ValueInner::Null)
    }

    /// Captures a value by its [`serde::Serialize`] implementation.
    pub fn serde<S>(value: S) -> Self
    where
        S: serde::Serialize + Send + Sync + 'static,
    {
        ValueInner::Serde(Arc::new(value)).into()
    }

    /// Captures a value by its [`Display`](fmt::Display) implementation.
    pub fn display<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        ValueInner::Display(Arc::new(value)).into()
    }

    /// Captures a value by its [`Debug`](fmt::Debug) implementation.
    pub fn debug<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        ValueInner::Debug(Arc::new(value)).into()
    }

    /// Captures an error.
    pub fn error<T>(value: T) -> Self
    where
        T: std::error::Error + Send + Sync + 'static,
    {
        ValueInner::Error(Arc::new(value)).into()
    }

    /// Creates a group of nested attributes.
    ///
    /// Members of a group are emitted with their keys qualified by the
    /// key of the attribute holding the group.
    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        ValueInner::Group(attrs.into_iter().collect()).into()
    }

    /// Returns `true` if this value is a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self.0, ValueInner::Group(_))
    }

    pub(crate) fn as_log_value(&self) -> log::kv::Value<'_> {
        match &self.0 {
            ValueInner::Null | ValueInner::Group(_) => log::kv::Value::null(),
            ValueInner::Bool(value) => log::kv::Value::from(*value),
            ValueInner::I64(value) => log::kv::Value::from(*value),
            ValueInner::U64(value) => log::kv::Value::from(*value),
            ValueInner::F64(value) => log::kv::Value::from(*value),
            ValueInner::String(value) => log::kv::Value::from(&**value),
            ValueInner::Duration(value) => log::kv::Value::from_debug(value),
            ValueInner::Debug(value) => log::kv::Value::from_dyn_debug(&**value),
            ValueInner::Display(value) => log::kv::Value::from_dyn_display(&**value),
            ValueInner::Error(value) => log::kv::Value::from_dyn_error(&**value),
            ValueInner::Serde(value) => log::kv::Value::from_serde(value),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ValueInner::Group(attrs) => f.debug_list().entries(attrs).finish(),
            _ => fmt::Debug::fmt(&self.as_log_value(), f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ValueInner::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
            _ => fmt::Display::fmt(&self.as_log_value(), f),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    ValueInner::$variant(<$target>::from(value)).into()
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool as bool,
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    f32 => F64 as f64,
    f64 => F64 as f64,
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::display(value), Self::from)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::display(value), Self::from)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        ValueInner::String(Cow::Owned(value.to_owned())).into()
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        ValueInner::String(Cow::Owned(value)).into()
    }
}

impl From<StaticCowStr> for Value {
    fn from(value: StaticCowStr) -> Self {
        ValueInner::String(value).into()
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Duration> for Value {
    fn from(value: Duration) -> Self {
        ValueInner::Duration(value).into()
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}
