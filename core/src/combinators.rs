//! Combinators: Boolean composition of matchers
//!
//! These work for any value type `V`: constants ([`is_any`], [`is_never`]),
//! conjunction and disjunction ([`is_both`], [`is_either`], [`all_of`],
//! [`any_of`]), refinement ([`refined`]) and failure ([`fail_with`]).
//!
//! Evaluation short-circuits left to right, and `check` is forwarded to the
//! children so a failing matcher raises only when it is actually consulted.

use crate::{BoxError, MatchError, SharedError, SharedMatcher, TypeMatcher};
use std::fmt;
use std::sync::Arc;

/// Matches every value. See [`is_any`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAny;

impl<V: ?Sized> TypeMatcher<V> for IsAny {
    fn test(&self, _value: &V) -> bool {
        true
    }

    fn name(&self) -> String {
        "is_any".to_owned()
    }
}

/// Matches no value. See [`is_never`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNever;

impl<V: ?Sized> TypeMatcher<V> for IsNever {
    fn test(&self, _value: &V) -> bool {
        false
    }

    fn name(&self) -> String {
        "is_never".to_owned()
    }
}

/// Matches any input value.
#[must_use]
pub fn is_any() -> IsAny {
    IsAny
}

/// Matches none of the input values.
#[must_use]
pub fn is_never() -> IsNever {
    IsNever
}

/// Both matchers must accept. See [`is_both`].
#[derive(Debug, Clone)]
pub struct Both<A, B>(A, B);

impl<V, A, B> TypeMatcher<V> for Both<A, B>
where
    V: ?Sized,
    A: TypeMatcher<V>,
    B: TypeMatcher<V>,
{
    fn test(&self, value: &V) -> bool {
        self.0.test(value) && self.1.test(value)
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        if !self.0.check(value)? {
            return Ok(false);
        }
        self.1.check(value)
    }

    fn name(&self) -> String {
        format!("is_both({}, {})", self.0.name(), self.1.name())
    }
}

/// Either matcher must accept. See [`is_either`].
#[derive(Debug, Clone)]
pub struct Either<A, B>(A, B);

impl<V, A, B> TypeMatcher<V> for Either<A, B>
where
    V: ?Sized,
    A: TypeMatcher<V>,
    B: TypeMatcher<V>,
{
    fn test(&self, value: &V) -> bool {
        self.0.test(value) || self.1.test(value)
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        if self.0.check(value)? {
            return Ok(true);
        }
        self.1.check(value)
    }

    fn name(&self) -> String {
        format!("is_either({}, {})", self.0.name(), self.1.name())
    }
}

/// Builds a matcher for values accepted by both `a` and `b`.
///
/// ```
/// use typematcher::{is_both, is_number, refined, TypeMatcher, Value};
///
/// let is_small = refined(is_number(), "Small", |v: &Value| v.as_f64().is_some_and(|n| n < 10.0));
/// let m = is_both(is_number(), is_small);
/// assert!(m.test(&Value::from(3)));
/// assert!(!m.test(&Value::from(30)));
/// ```
pub fn is_both<A, B>(a: A, b: B) -> Both<A, B> {
    Both(a, b)
}

/// Builds a matcher for values accepted by `a` or `b`.
pub fn is_either<A, B>(a: A, b: B) -> Either<A, B> {
    Either(a, b)
}

/// All children must accept (logical AND over a list).
///
/// An empty list accepts everything.
pub struct AllOf<V: ?Sized>(Vec<SharedMatcher<V>>);

/// Any child must accept (logical OR over a list).
///
/// An empty list accepts nothing.
pub struct AnyOf<V: ?Sized>(Vec<SharedMatcher<V>>);

/// Builds an [`AllOf`] matcher.
pub fn all_of<V: ?Sized>(matchers: impl IntoIterator<Item = SharedMatcher<V>>) -> AllOf<V> {
    AllOf(matchers.into_iter().collect())
}

/// Builds an [`AnyOf`] matcher.
pub fn any_of<V: ?Sized>(matchers: impl IntoIterator<Item = SharedMatcher<V>>) -> AnyOf<V> {
    AnyOf(matchers.into_iter().collect())
}

impl<V: ?Sized> TypeMatcher<V> for AllOf<V> {
    fn test(&self, value: &V) -> bool {
        self.0.iter().all(|m| m.test(value))
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        for m in &self.0 {
            if !m.check(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> String {
        format!("all_of({})", join_names(&self.0))
    }
}

impl<V: ?Sized> TypeMatcher<V> for AnyOf<V> {
    fn test(&self, value: &V) -> bool {
        self.0.iter().any(|m| m.test(value))
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        for m in &self.0 {
            if m.check(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn name(&self) -> String {
        format!("any_of({})", join_names(&self.0))
    }
}

fn join_names<V: ?Sized>(matchers: &[SharedMatcher<V>]) -> String {
    matchers
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A base matcher narrowed by an extra predicate. See [`refined`].
pub struct Refined<M, F> {
    base: M,
    tag: String,
    refinement: F,
}

impl<V, M, F> TypeMatcher<V> for Refined<M, F>
where
    V: ?Sized,
    M: TypeMatcher<V>,
    F: Fn(&V) -> bool + Send + Sync,
{
    fn test(&self, value: &V) -> bool {
        self.base.test(value) && (self.refinement)(value)
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        Ok(self.base.check(value)? && (self.refinement)(value))
    }

    fn name(&self) -> String {
        format!("{}<{}>", self.base.name(), self.tag)
    }
}

impl<M, F> fmt::Debug for Refined<M, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Refined").field("tag", &self.tag).finish()
    }
}

/// Builds a refined matcher: `base` must accept, then `refinement` must hold.
///
/// The refinement only runs on values the base matcher accepted. `tag` names
/// the refinement in traces (`is_finite_number<Positive>`).
///
/// ```
/// use typematcher::{is_finite_number, refined, TypeMatcher, Value};
///
/// let is_positive = refined(is_finite_number(), "Positive", |v: &Value| {
///     v.as_f64().is_some_and(|n| n > 0.0)
/// });
/// assert!(is_positive.test(&Value::from(1)));
/// assert!(!is_positive.test(&Value::from(0)));
/// assert!(!is_positive.test(&Value::from(-1)));
/// ```
pub fn refined<V, M, F>(base: M, tag: impl Into<String>, refinement: F) -> Refined<M, F>
where
    V: ?Sized,
    M: TypeMatcher<V>,
    F: Fn(&V) -> bool + Send + Sync,
{
    Refined {
        base,
        tag: tag.into(),
        refinement,
    }
}

/// A matcher that raises a fixed error instead of answering `false`.
/// See [`fail_with`].
pub struct FailWith<M> {
    inner: M,
    error: SharedError,
}

impl<V, M> TypeMatcher<V> for FailWith<M>
where
    V: ?Sized,
    M: TypeMatcher<V>,
{
    fn test(&self, value: &V) -> bool {
        self.inner.test(value)
    }

    fn check(&self, value: &V) -> Result<bool, MatchError> {
        if self.inner.check(value)? {
            Ok(true)
        } else {
            Err(MatchError::Raised(Arc::clone(&self.error)))
        }
    }

    fn name(&self) -> String {
        format!("fail_with({})", self.inner.name())
    }
}

impl<M> fmt::Debug for FailWith<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailWith")
            .field("error", &self.error.to_string())
            .finish()
    }
}

/// Builds a matcher that raises `error` when `matcher` misses.
///
/// Useful inside [`has_fields`](crate::has_fields) to report which field was
/// wrong instead of a bare no-match. The same error object is raised on every
/// miss.
///
/// ```
/// use typematcher::{case_id, fail_with, has_fields, is_string, match_value, shared, Value};
///
/// let case = case_id(has_fields([(
///     "title",
///     shared(fail_with("invalid title: string expected", is_string())),
/// )]));
///
/// let err = match_value(&Value::object([("title", Value::from(1))]), &case).unwrap_err();
/// assert_eq!(err.to_string(), "invalid title: string expected");
/// ```
pub fn fail_with<M>(error: impl Into<BoxError>, matcher: M) -> FailWith<M> {
    FailWith {
        inner: matcher,
        error: Arc::from(error.into()),
    }
}
