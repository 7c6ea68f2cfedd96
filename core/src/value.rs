//! `Value`: Dynamic input values inspected by the built-in matchers
//!
//! The matcher library works over an untyped value, the way a dynamically
//! typed host would hand data to a predicate. `Value` covers the usual JSON-ish
//! shapes plus `Undefined` (an absent field) and `Custom` (opaque host objects).
//!
//! # Extensibility via `Custom`
//!
//! For host types not covered by the primitives, implement [`CustomValue`]
//! and wrap in `Value::Custom(Arc::new(your_type))`. Such values are matched
//! by [`is_instance_of`](crate::is_instance_of).

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Extension trait for opaque host objects carried inside a [`Value`].
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use typematcher::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// impl CustomValue for Point {
///     fn custom_type_name(&self) -> &'static str {
///         "point"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Custom(Arc::new(Point { x: 1.0, y: 2.0 }));
/// assert!(value.is_custom());
/// assert_eq!(value.type_name(), "point");
/// ```
pub trait CustomValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier.
    ///
    /// Convention: `snake_case` names, e.g. `"point"`, `"socket"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any`, enabling downcasts.
    fn as_any(&self) -> &dyn Any;
}

/// An untyped value to be tested by matchers.
///
/// # Example
///
/// ```
/// use typematcher::Value;
///
/// let value = Value::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert!(!value.is_missing());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value at all, e.g. a field that is not present on an object.
    #[default]
    Undefined,

    /// An explicit null.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Numeric value. `NaN` and infinities are numbers too.
    Number(f64),

    /// String value.
    String(String),

    /// Ordered list of values.
    Array(Vec<Value>),

    /// String-keyed map of values.
    Object(BTreeMap<String, Value>),

    /// Opaque host object, compared by identity.
    Custom(Arc<dyn CustomValue>),
}

// Strict equality: numbers follow IEEE comparison (NaN != NaN) and custom
// values are equal only when they share an allocation.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns `true` for `Undefined`.
    #[inline]
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for `Null`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for `Null` or `Undefined`.
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Returns `true` for `Custom`.
    #[inline]
    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the inner [`CustomValue`] trait object, if any.
    ///
    /// Use [`CustomValue::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Looks up a field of an object.
    ///
    /// Absent fields, and fields of non-objects, read as `Undefined`.
    #[must_use]
    pub fn field(&self, key: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        match self {
            Self::Object(map) => map.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Returns a string describing the shape of this value.
    ///
    /// For `Custom` values this delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Custom(c) => c.custom_type_name(),
        }
    }

    /// Builds an object from key/value pairs.
    ///
    /// ```
    /// use typematcher::Value;
    ///
    /// let user = Value::object([("id", Value::from(1)), ("name", Value::from("ann"))]);
    /// assert_eq!(user.field("name").as_str(), Some("ann"));
    /// assert!(user.field("email").is_undefined());
    /// ```
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

macro_rules! from_integer {
    (lossless: $($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(n: $ty) -> Self {
                Self::Number(f64::from(n))
            }
        }
    )*};
    (lossy: $($ty:ty),*) => {$(
        /// Magnitudes above 2^53 are rounded to the nearest `f64`.
        impl From<$ty> for Value {
            #[allow(clippy::cast_precision_loss)]
            fn from(n: $ty) -> Self {
                Self::Number(n as f64)
            }
        }
    )*};
}

from_integer!(lossless: i8, i16, i32, u8, u16, u32);
from_integer!(lossy: i64, u64, isize, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
