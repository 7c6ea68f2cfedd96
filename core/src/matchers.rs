//! Built-in matchers over [`Value`]
//!
//! Primitive checks (`is_string`, `is_number`, ...), shape checks
//! (`is_array_of`, `has_fields`, `is_tuple`, ...) and a few helpers for
//! optional data. Shape matchers fail fast on the first child that misses.
//!
//! # Available Matchers
//!
//! | Matcher | Accepts |
//! |---------|---------|
//! | [`is_string`] | strings |
//! | [`is_number`] | numbers, including `NaN` and infinities |
//! | [`is_finite_number`] | numbers except `NaN` and infinities |
//! | [`is_boolean`] | booleans |
//! | [`is_object`] | objects, arrays and custom values |
//! | [`is_instance_of`] | custom values of one concrete type |
//! | [`is_null`], [`is_undefined`], [`is_missing`] | null / undefined / either |
//! | [`is_value`] | one exact value |
//! | [`is_array_of`] | arrays whose every item matches |
//! | [`is_object_map_of`] | object-like values whose every field matches |
//! | [`has_fields`] | object-like values whose named fields match |
//! | [`is_tuple`] | arrays of exact length, matched by position |
//! | [`is_optional`], [`is_nullable`] | undefined / null, or the inner match |
//! | [`matches_pattern`] | strings matching a regex |

use crate::{
    combinators::Either, ConfigError, MatchError, SharedMatcher, TypeMatcher, Value,
    MAX_REGEX_PATTERN_LENGTH,
};
use std::fmt;
use std::marker::PhantomData;

// ═══════════════════════════════════════════════════════════════════════════════
// Primitive Matchers
// ═══════════════════════════════════════════════════════════════════════════════

macro_rules! primitive_matcher {
    ($(#[$doc:meta])* $ty:ident, $ctor:ident, |$v:ident| $body:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl TypeMatcher<Value> for $ty {
            fn test(&self, $v: &Value) -> bool {
                $body
            }

            fn name(&self) -> String {
                stringify!($ctor).to_owned()
            }
        }

        $(#[$doc])*
        #[must_use]
        pub fn $ctor() -> $ty {
            $ty
        }
    };
}

primitive_matcher!(
    /// Matches string values.
    IsString, is_string, |v| matches!(v, Value::String(_))
);

primitive_matcher!(
    /// Matches number values, `NaN` and infinities included.
    IsNumber, is_number, |v| matches!(v, Value::Number(_))
);

primitive_matcher!(
    /// Matches number values, but not `NaN` or infinities.
    IsFiniteNumber, is_finite_number, |v| v.as_f64().is_some_and(f64::is_finite)
);

primitive_matcher!(
    /// Matches boolean values.
    IsBoolean, is_boolean, |v| matches!(v, Value::Bool(_))
);

primitive_matcher!(
    /// Matches objects, arrays and custom host values.
    IsObject, is_object, |v| matches!(v, Value::Object(_) | Value::Array(_) | Value::Custom(_))
);

primitive_matcher!(
    /// Matches `null`.
    IsNull, is_null, |v| v.is_null()
);

primitive_matcher!(
    /// Matches `undefined`.
    IsUndefined, is_undefined, |v| v.is_undefined()
);

primitive_matcher!(
    /// Matches `null` or `undefined`.
    IsMissing, is_missing, |v| v.is_missing()
);

/// Matches custom values whose concrete type is `T`. See [`is_instance_of`].
pub struct IsInstanceOf<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> TypeMatcher<Value> for IsInstanceOf<T> {
    fn test(&self, value: &Value) -> bool {
        value.as_custom().is_some_and(|c| c.as_any().is::<T>())
    }

    fn name(&self) -> String {
        format!("is_instance_of<{}>", std::any::type_name::<T>())
    }
}

impl<T> fmt::Debug for IsInstanceOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsInstanceOf")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Matches [`Value::Custom`] values built from the host type `T`.
#[must_use]
pub fn is_instance_of<T: 'static>() -> IsInstanceOf<T> {
    IsInstanceOf {
        _phantom: PhantomData,
    }
}

/// Matches exactly one value. See [`is_value`].
#[derive(Debug, Clone)]
pub struct IsValue {
    expected: Value,
}

impl IsValue {
    /// Returns the expected value.
    #[must_use]
    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl TypeMatcher<Value> for IsValue {
    fn test(&self, value: &Value) -> bool {
        *value == self.expected
    }

    fn name(&self) -> String {
        format!("is_value({:?})", self.expected)
    }
}

/// Matches values strictly equal to `expected`.
///
/// Equality is strict: `NaN` never matches, custom values match by identity.
///
/// ```
/// use typematcher::{is_value, TypeMatcher, Value};
///
/// let is_one = is_value("one");
/// assert!(is_one.test(&Value::from("one")));
/// assert!(!is_one.test(&Value::from(1)));
/// ```
pub fn is_value(expected: impl Into<Value>) -> IsValue {
    IsValue {
        expected: expected.into(),
    }
}

/// Alias of [`is_value`], reads better for literal tags.
pub fn is_literal(expected: impl Into<Value>) -> IsValue {
    is_value(expected)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shape Matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches arrays whose items all match. See [`is_array_of`].
pub struct ArrayOf {
    item: SharedMatcher<Value>,
}

impl TypeMatcher<Value> for ArrayOf {
    fn test(&self, value: &Value) -> bool {
        value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| self.item.test(item)))
    }

    fn check(&self, value: &Value) -> Result<bool, MatchError> {
        let Some(items) = value.as_array() else {
            return Ok(false);
        };
        for item in items {
            if !self.item.check(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> String {
        format!("is_array_of({})", self.item.name())
    }
}

/// Matches arrays whose every item matches `item`. Empty arrays match.
///
/// ```
/// use typematcher::{is_array_of, is_number, is_string, TypeMatcher, Value};
///
/// assert!(is_array_of(is_number()).test(&Value::from(vec![Value::from(1)])));
/// assert!(!is_array_of(is_string()).test(&Value::from(vec![Value::from(1)])));
/// assert!(is_array_of(is_string()).test(&Value::Array(vec![])));
/// ```
pub fn is_array_of(item: impl TypeMatcher<Value> + 'static) -> ArrayOf {
    ArrayOf {
        item: crate::shared(item),
    }
}

/// Matches objects whose field values all match. See [`is_object_map_of`].
pub struct ObjectMapOf {
    field: SharedMatcher<Value>,
}

impl ObjectMapOf {
    /// The values held by an object-like value; `None` for everything else.
    ///
    /// Arrays hold their items. Custom values expose nothing.
    fn values(value: &Value) -> Option<Box<dyn Iterator<Item = &Value> + '_>> {
        match value {
            Value::Object(map) => Some(Box::new(map.values())),
            Value::Array(items) => Some(Box::new(items.iter())),
            Value::Custom(_) => Some(Box::new(std::iter::empty())),
            _ => None,
        }
    }
}

impl TypeMatcher<Value> for ObjectMapOf {
    fn test(&self, value: &Value) -> bool {
        Self::values(value).is_some_and(|mut values| values.all(|v| self.field.test(v)))
    }

    fn check(&self, value: &Value) -> Result<bool, MatchError> {
        let Some(values) = Self::values(value) else {
            return Ok(false);
        };
        for v in values {
            if !self.field.check(v)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> String {
        format!("is_object_map_of({})", self.field.name())
    }
}

/// Matches objects used as maps: every field value must match `field`.
///
/// Anything [`is_object`] accepts qualifies. Array items count as values, and
/// custom values have none, so they always match.
pub fn is_object_map_of(field: impl TypeMatcher<Value> + 'static) -> ObjectMapOf {
    ObjectMapOf {
        field: crate::shared(field),
    }
}

/// Matches objects by named fields. See [`has_fields`].
pub struct HasFields {
    fields: Vec<(String, SharedMatcher<Value>)>,
}

impl HasFields {
    /// Returns the names of the checked fields, in check order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl TypeMatcher<Value> for HasFields {
    fn test(&self, value: &Value) -> bool {
        IsObject.test(value) && self.fields.iter().all(|(k, m)| m.test(value.field(k)))
    }

    fn check(&self, value: &Value) -> Result<bool, MatchError> {
        if !IsObject.test(value) {
            return Ok(false);
        }
        for (key, matcher) in &self.fields {
            if !matcher.check(value.field(key))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|(k, m)| format!("{k}: {}", m.name()))
            .collect();
        format!("has_fields({{{}}})", fields.join(", "))
    }
}

/// Matches object-like values whose named fields match the given matchers.
///
/// Anything [`is_object`] accepts qualifies. Fields are checked in the order
/// given. An absent field is tested as [`Value::Undefined`], so
/// [`is_optional`] makes a field optional; arrays and custom values have no
/// fields. Extra fields on the value are ignored.
///
/// ```
/// use typematcher::{has_fields, is_number, is_optional, is_string, shared, TypeMatcher, Value};
///
/// let is_user = has_fields([
///     ("id", shared(is_number())),
///     ("email", shared(is_optional(is_string()))),
/// ]);
///
/// assert!(is_user.test(&Value::object([("id", Value::from(1))])));
/// assert!(!is_user.test(&Value::object([("id", Value::from("aloha"))])));
/// ```
pub fn has_fields<K, I>(fields: I) -> HasFields
where
    K: Into<String>,
    I: IntoIterator<Item = (K, SharedMatcher<Value>)>,
{
    HasFields {
        fields: fields.into_iter().map(|(k, m)| (k.into(), m)).collect(),
    }
}

/// Matches fixed-length arrays by position. See [`is_tuple`].
pub struct Tuple {
    items: Vec<SharedMatcher<Value>>,
}

impl Tuple {
    /// Number of positions in the tuple.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.items.len()
    }
}

impl TypeMatcher<Value> for Tuple {
    fn test(&self, value: &Value) -> bool {
        value.as_array().is_some_and(|items| {
            items.len() == self.items.len()
                && self.items.iter().zip(items).all(|(m, item)| m.test(item))
        })
    }

    fn check(&self, value: &Value) -> Result<bool, MatchError> {
        let Some(items) = value.as_array() else {
            return Ok(false);
        };
        if items.len() != self.items.len() {
            return Ok(false);
        }
        for (matcher, item) in self.items.iter().zip(items) {
            if !matcher.check(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> String {
        let items: Vec<String> = self.items.iter().map(|m| m.name()).collect();
        format!("is_tuple([{}])", items.join(", "))
    }
}

/// Matches arrays of exactly `items.len()` elements, each matched by the
/// matcher at the same position.
///
/// ```
/// use typematcher::{is_number, is_string, is_tuple, shared, TypeMatcher, Value};
///
/// let pair = is_tuple([shared(is_string()), shared(is_number())]);
/// assert!(pair.test(&Value::from(vec![Value::from("a"), Value::from(1)])));
/// assert!(!pair.test(&Value::from(vec![Value::from("a")])));
/// ```
pub fn is_tuple(items: impl IntoIterator<Item = SharedMatcher<Value>>) -> Tuple {
    Tuple {
        items: items.into_iter().collect(),
    }
}

/// Matches `undefined` or whatever `matcher` accepts.
pub fn is_optional<M: TypeMatcher<Value>>(matcher: M) -> Either<IsUndefined, M> {
    crate::is_either(IsUndefined, matcher)
}

/// Matches `null` or whatever `matcher` accepts.
pub fn is_nullable<M: TypeMatcher<Value>>(matcher: M) -> Either<IsNull, M> {
    crate::is_either(IsNull, matcher)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pattern Matcher
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches strings against a regular expression. See [`matches_pattern`].
///
/// Uses the Rust `regex` crate, which guarantees linear-time matching.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: regex::Regex,
}

impl Pattern {
    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl TypeMatcher<Value> for Pattern {
    fn test(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|s| self.regex.is_match(s))
    }

    fn name(&self) -> String {
        format!("matches_pattern(/{}/)", self.regex.as_str())
    }
}

/// Builds a matcher for strings matching `pattern`.
///
/// # Errors
///
/// - [`ConfigError::PatternTooLong`] if the pattern exceeds
///   [`MAX_REGEX_PATTERN_LENGTH`]
/// - [`ConfigError::InvalidPattern`] if the regex does not compile
///
/// ```
/// use typematcher::{matches_pattern, TypeMatcher, Value};
///
/// let m = matches_pattern(r"^user-\d+$").unwrap();
/// assert!(m.test(&Value::from("user-42")));
/// assert!(!m.test(&Value::from("user-x")));
/// assert!(!m.test(&Value::from(42)));
/// ```
pub fn matches_pattern(pattern: &str) -> Result<Pattern, ConfigError> {
    if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
        return Err(ConfigError::PatternTooLong {
            len: pattern.len(),
            max: MAX_REGEX_PATTERN_LENGTH,
        });
    }
    let regex = regex::Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })?;
    Ok(Pattern { regex })
}
