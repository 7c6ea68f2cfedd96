//! `TypeMatcher`: Runtime type predicates
//!
//! A `TypeMatcher<V>` answers one question: does this value have the shape I
//! expect? Matchers are pure and reusable, and carry no ordering requirement
//! among each other. The case DSL consumes them as opaque guards.
//!
//! Any `Fn(&V) -> bool + Send + Sync` closure is a matcher, so ad-hoc
//! predicates need no wrapper type.

use crate::MatchError;
use std::sync::Arc;

/// A pure predicate over values of type `V`.
///
/// # Failing matchers
///
/// [`test`](Self::test) is total. [`check`](Self::check) is what the case
/// engine calls; it defaults to `Ok(self.test(value))`. Only matchers built
/// to fail on a miss (see [`fail_with`](crate::fail_with)) return `Err`, and
/// composite matchers forward `check` to their children so such a failure
/// surfaces from any depth.
///
/// # Example
///
/// ```
/// use typematcher::{TypeMatcher, Value};
///
/// let is_one = |v: &Value| v.as_str() == Some("one");
/// assert!(is_one.test(&Value::from("one")));
/// assert!(!is_one.test(&Value::from("two")));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `TypeMatcher<{V}>`",
    label = "this type cannot test values of type `{V}`",
    note = "use a built-in matcher (is_string(), has_fields(..), ...) or a closure `|v: &{V}| -> bool`"
)]
pub trait TypeMatcher<V: ?Sized>: Send + Sync {
    /// Returns `true` if the value conforms to this matcher.
    fn test(&self, value: &V) -> bool;

    /// Like [`test`](Self::test), but may raise instead of answering `false`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Raised`] when the matcher was built to fail on a miss.
    fn check(&self, value: &V) -> Result<bool, MatchError> {
        Ok(self.test(value))
    }

    /// Short human-readable name, used in traces and logs.
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_owned()
    }
}

impl<V, F> TypeMatcher<V> for F
where
    V: ?Sized,
    F: Fn(&V) -> bool + Send + Sync,
{
    fn test(&self, value: &V) -> bool {
        self(value)
    }

    fn name(&self) -> String {
        "fn".to_owned()
    }
}

/// A shared, type-erased matcher.
pub type SharedMatcher<V> = Arc<dyn TypeMatcher<V>>;

/// Erase a matcher into a [`SharedMatcher`].
///
/// A `SharedMatcher` is not itself a [`TypeMatcher`]. To hand one back to an
/// API that takes a matcher by value (`case_when`, `is_array_of`, ...), wrap
/// it in [`Erased`].
pub fn shared<V, M>(matcher: M) -> SharedMatcher<V>
where
    V: ?Sized,
    M: TypeMatcher<V> + 'static,
{
    Arc::new(matcher)
}

/// A [`SharedMatcher`] usable wherever a matcher is taken by value.
///
/// ```
/// use typematcher::{case_when, is_string, shared, Erased, SharedMatcher, Value};
///
/// let guard: SharedMatcher<Value> = shared(is_string());
/// let case = case_when(Erased(guard), |_: &Value| "string");
/// assert_eq!(case.evaluate(&Value::from("s")).unwrap(), "string");
/// ```
pub struct Erased<V: ?Sized>(pub SharedMatcher<V>);

impl<V: ?Sized> TypeMatcher<V> for Erased<V> {
    fn test(&self, value: &V) -> bool {
        self.0.test(value)
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        self.0.check(value)
    }

    fn name(&self) -> String {
        self.0.name()
    }
}

impl<V: ?Sized> Clone for Erased<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<V: ?Sized> From<SharedMatcher<V>> for Erased<V> {
    fn from(matcher: SharedMatcher<V>) -> Self {
        Self(matcher)
    }
}

impl<V: ?Sized> std::fmt::Debug for Erased<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Erased").field(&self.0.name()).finish()
    }
}
