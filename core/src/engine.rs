//! Match engine: Dispatch a value through a case chain
//!
//! The engine tests no predicates itself. It runs a chain and converts the
//! final `Unmatched` into [`MatchError::NoMatch`]; raised errors pass through
//! unchanged and panics in user handlers unwind unchanged.

use crate::{Case, CaseOutcome, MatchError};
use std::fmt;

/// Dispatches `value` to the first arm of `case` that accepts it.
///
/// # Errors
///
/// - [`MatchError::NoMatch`] if no arm accepts the value
/// - [`MatchError::Raised`] if the accepting arm, or a failing guard, raises
///
/// ```
/// use typematcher::{case_default, case_when, is_string, match_value, Value};
///
/// let case = case_when(is_string(), |_: &Value| "string").or(case_default(|| "fallback"));
/// assert_eq!(match_value(&Value::from(10), &case).unwrap(), "fallback");
/// ```
pub fn match_value<V, R>(value: &V, case: &Case<V, R>) -> Result<R, MatchError>
where
    V: ?Sized,
{
    case.evaluate(value)
}

/// Pre-builds a matching function from a chain, to be applied to many values.
///
/// ```
/// use typematcher::{case_id, is_number, match_with, Value};
///
/// let numbers_only = match_with(case_id(is_number()));
/// assert!(numbers_only(&Value::from(1)).is_ok());
/// assert!(numbers_only(&Value::from("1")).unwrap_err().is_no_match());
/// ```
pub fn match_with<V, R>(case: Case<V, R>) -> impl Fn(&V) -> Result<R, MatchError> + Send + Sync
where
    V: ?Sized,
{
    move |value: &V| case.evaluate(value)
}

/// Value-first matching: `match_on(&v).against([&c1, &c2])`.
///
/// Cases supplied independently are tried in argument order, exactly as if
/// they had been joined with [`Case::or`].
#[must_use]
pub fn match_on<V: ?Sized>(value: &V) -> MatchOn<'_, V> {
    MatchOn { value }
}

/// A value waiting for cases. See [`match_on`].
pub struct MatchOn<'v, V: ?Sized> {
    value: &'v V,
}

// Only a reference is held, so no bounds on `V`.
impl<V: ?Sized> Clone for MatchOn<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: ?Sized> Copy for MatchOn<'_, V> {}

impl<V: ?Sized> fmt::Debug for MatchOn<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchOn")
            .field("input", &std::any::type_name::<V>())
            .finish()
    }
}

impl<'v, V: ?Sized> MatchOn<'v, V> {
    /// Tries `cases` in order and returns the first result.
    ///
    /// # Errors
    ///
    /// As [`match_value`].
    ///
    /// ```
    /// use typematcher::{case_id, case_when, is_number, is_string, match_on, Value};
    ///
    /// let strings = case_when(is_string(), |_: &Value| "string");
    /// let numbers = case_when(is_number(), |_: &Value| "number");
    ///
    /// let kind = match_on(&Value::from(3)).against([&strings, &numbers]).unwrap();
    /// assert_eq!(kind, "number");
    /// ```
    pub fn against<'c, R, I>(self, cases: I) -> Result<R, MatchError>
    where
        I: IntoIterator<Item = &'c Case<V, R>>,
        V: 'c,
        R: 'c,
    {
        let mut tried = 0usize;
        for case in cases {
            if let CaseOutcome::Matched(result) = case.try_match(self.value)? {
                return Ok(result);
            }
            tried += case.len();
        }
        tracing::debug!(input = std::any::type_name::<V>(), arms = tried, "no arm matched");
        Err(MatchError::no_match::<V>())
    }
}
