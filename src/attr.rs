//! Attributes and typed key/value lists.

use crate::{StaticCowStr, Value, value::ValueInner};

/// A key/value pair attached to a log record.
#[derive(Debug, Clone)]
pub struct Attr {
    /// The attribute key.
    pub key: StaticCowStr,
    /// The attribute value.
    pub value: Value,
}

impl Attr {
    /// Creates a new attribute.
    pub fn new(key: impl Into<StaticCowStr>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a group attribute.
    ///
    /// The members are emitted as `name.key`. A group without members is dropped,
    /// and a group with an empty name inlines its members.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctxlog::Attr;
    ///
    /// let attr = Attr::group("db", [Attr::new("table", "users"), Attr::new("rows", 3)]);
    /// assert!(attr.value.is_group());
    /// ```
    pub fn group(name: impl Into<StaticCowStr>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self::new(name, Value::group(attrs))
    }
}

impl<K, V> From<(K, V)> for Attr
where
    K: Into<StaticCowStr>,
    V: Into<Value>,
{
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A typed list of key/value pairs.
///
/// Every entry is a `(key, value)` pair or a ready [`Attr`], so an unpaired key
/// or a key that is not a string cannot be expressed. Implemented for:
///
/// - `()` for an empty list;
/// - arrays, slices and vectors of pairs or of [`Attr`];
/// - tuples of up to twelve pairs, whose values may differ in type.
///
/// # Examples
///
/// ```
/// use ctxlog::{Attr, Context};
///
/// let ctx = Context::background();
/// ctxlog::info(&ctx, "no attributes", ());
/// ctxlog::info(&ctx, "same value types", [("user", "john"), ("session", "abc123")]);
/// ctxlog::info(&ctx, "mixed value types", (("user", "john"), ("attempt", 3)));
/// ctxlog::info(&ctx, "typed attributes", [Attr::new("attempt", 3)]);
/// ```
pub trait KeyValues {
    /// Appends the attributes to `attrs`.
    fn append_to(self, attrs: &mut Vec<Attr>);

    /// Collects the attributes into a vector.
    fn into_attrs(self) -> Vec<Attr>
    where
        Self: Sized,
    {
        let mut attrs = Vec::new();
        self.append_to(&mut attrs);
        attrs
    }
}

impl KeyValues for () {
    fn append_to(self, _attrs: &mut Vec<Attr>) {}
}

impl<K, V, const N: usize> KeyValues for [(K, V); N]
where
    K: Into<StaticCowStr>,
    V: Into<Value>,
{
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend(self.into_iter().map(Attr::from));
    }
}

impl<K, V> KeyValues for Vec<(K, V)>
where
    K: Into<StaticCowStr>,
    V: Into<Value>,
{
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend(self.into_iter().map(Attr::from));
    }
}

impl<K, V> KeyValues for &[(K, V)]
where
    K: Into<StaticCowStr> + Clone,
    V: Into<Value> + Clone,
{
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend(self.iter().cloned().map(Attr::from));
    }
}

impl<const N: usize> KeyValues for [Attr; N] {
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend(self);
    }
}

impl KeyValues for Vec<Attr> {
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend(self);
    }
}

impl KeyValues for &[Attr] {
    fn append_to(self, attrs: &mut Vec<Attr>) {
        attrs.extend_from_slice(self);
    }
}

macro_rules! impl_key_values_for_tuple {
    ($($key:ident $value:ident $idx:tt),+) => {
        impl<$($key, $value),+> KeyValues for ($(($key, $value),)+)
        where
            $($key: Into<StaticCowStr>, $value: Into<Value>,)+
        {
            fn append_to(self, attrs: &mut Vec<Attr>) {
                $(attrs.push(Attr::from(self.$idx));)+
            }
        }
    };
}

impl_key_values_for_tuple!(K0 V0 0);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1, K2 V2 2);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5);
impl_key_values_for_tuple!(K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6);
impl_key_values_for_tuple!(
    K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6, K7 V7 7
);
impl_key_values_for_tuple!(
    K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6, K7 V7 7, K8 V8 8
);
impl_key_values_for_tuple!(
    K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6, K7 V7 7, K8 V8 8, K9 V9 9
);
impl_key_values_for_tuple!(
    K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6, K7 V7 7, K8 V8 8, K9 V9 9,
    K10 V10 10
);
impl_key_values_for_tuple!(
    K0 V0 0, K1 V1 1, K2 V2 2, K3 V3 3, K4 V4 4, K5 V5 5, K6 V6 6, K7 V7 7, K8 V8 8, K9 V9 9,
    K10 V10 10, K11 V11 11
);

/// Flattens group attributes into dotted keys under `prefix`.
pub(crate) fn flatten_into(prefix: Option<&str>, attrs: &[Attr], out: &mut Vec<Attr>) {
    for attr in attrs {
        match &attr.value.0 {
            ValueInner::Group(members) if members.is_empty() => {}
            ValueInner::Null if attr.key.is_empty() => {}
            ValueInner::Group(members) if attr.key.is_empty() => flatten_into(prefix, members, out),
            ValueInner::Group(members) => {
                flatten_into(Some(qualify(prefix, &attr.key).as_ref()), members, out);
            }
            _ => out.push(Attr {
                key: qualify(prefix, &attr.key),
                value: attr.value.clone(),
            }),
        }
    }
}

pub(crate) fn qualify(prefix: Option<&str>, key: &StaticCowStr) -> StaticCowStr {
    match prefix {
        Some(prefix) => format!("{prefix}.{key}").into(),
        None => key.clone(),
    }
}
