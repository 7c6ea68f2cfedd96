//! Case: Guarded handlers and their composition
//!
//! A [`Case`] is an ordered list of arms. Each arm pairs an optional guard
//! (a [`TypeMatcher`]) with a handler. Evaluating a case tries the arms in
//! declaration order and stops at the first guard that accepts the value.
//!
//! Composition is concatenation of arm lists, so chaining is associative and
//! the first attached arm is always the first tried.

use crate::trace::{EvalStep, EvalTrace};
use crate::{shared, BoxError, MatchError, SharedError, SharedMatcher, TypeMatcher};
use std::fmt;
use std::sync::Arc;

/// Result of trying a case against a value.
///
/// `Unmatched` means "not for me, try the next one". It is a normal outcome,
/// not an error; the engine turns it into [`MatchError::NoMatch`] only at the
/// end of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOutcome<R> {
    /// An arm accepted the value and produced this result.
    Matched(R),
    /// No arm accepted the value.
    Unmatched,
}

impl<R> CaseOutcome<R> {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Converts into an `Option`, `Unmatched` becoming `None`.
    pub fn into_option(self) -> Option<R> {
        match self {
            Self::Matched(r) => Some(r),
            Self::Unmatched => None,
        }
    }

    /// Maps the matched result.
    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> CaseOutcome<T> {
        match self {
            Self::Matched(r) => CaseOutcome::Matched(f(r)),
            Self::Unmatched => CaseOutcome::Unmatched,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Arms
// ═══════════════════════════════════════════════════════════════════════════════

type MapFn<V, R> = Arc<dyn Fn(&V) -> R + Send + Sync>;
type TryFn<V, R> = Arc<dyn Fn(&V) -> Result<R, BoxError> + Send + Sync>;

enum Handler<V: ?Sized, R> {
    Map(MapFn<V, R>),
    Try(TryFn<V, R>),
    Throw(SharedError),
}

impl<V: ?Sized, R> Handler<V, R> {
    fn run(&self, value: &V) -> Result<R, MatchError> {
        match self {
            Self::Map(f) => Ok(f(value)),
            Self::Try(f) => f(value).map_err(|e| MatchError::Raised(Arc::from(e))),
            Self::Throw(e) => Err(MatchError::Raised(Arc::clone(e))),
        }
    }
}

struct Arm<V: ?Sized, R> {
    /// `None` for unconditional arms.
    guard: Option<SharedMatcher<V>>,
    handler: Handler<V, R>,
}

impl<V: ?Sized, R> Arm<V, R> {
    fn accepts(&self, value: &V) -> Result<bool, MatchError> {
        match &self.guard {
            Some(guard) => guard.check(value),
            None => Ok(true),
        }
    }

    fn guard_name(&self) -> String {
        match &self.guard {
            Some(guard) => guard.name(),
            None => "<always>".to_owned(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Case
// ═══════════════════════════════════════════════════════════════════════════════

/// An ordered chain of guarded handlers.
///
/// Build one with the free constructors ([`case_when`], [`case_id`],
/// [`case_any`], [`case_default`], [`case_throw`], [`case_try`]) and extend
/// it with the same-named methods or [`or`](Self::or).
///
/// # INV: First-declared wins
///
/// Arms are tried in the order they were attached. Once an arm accepts, no
/// later guard is consulted and no other handler runs.
///
/// # Example
///
/// ```
/// use typematcher::{case_when, is_number, is_string, Value};
///
/// let describe = case_when(is_string(), |_: &Value| "string")
///     .case_when(is_number(), |_: &Value| "number")
///     .case_default(|| "other");
///
/// assert_eq!(describe.evaluate(&Value::from(1)).unwrap(), "number");
/// assert_eq!(describe.evaluate(&Value::Null).unwrap(), "other");
/// ```
pub struct Case<V: ?Sized, R> {
    arms: Vec<Arc<Arm<V, R>>>,
}

impl<V: ?Sized, R> Clone for Case<V, R> {
    fn clone(&self) -> Self {
        Self {
            arms: self.arms.clone(),
        }
    }
}

impl<V: ?Sized, R> fmt::Debug for Case<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guards: Vec<String> = self.arms.iter().map(|arm| arm.guard_name()).collect();
        f.debug_struct("Case").field("arms", &guards).finish()
    }
}

impl<V: ?Sized, R> Case<V, R> {
    /// A case with no arms. It never matches.
    #[must_use]
    pub fn empty() -> Self {
        Self { arms: Vec::new() }
    }

    fn single(guard: Option<SharedMatcher<V>>, handler: Handler<V, R>) -> Self {
        Self {
            arms: vec![Arc::new(Arm { guard, handler })],
        }
    }

    fn push(mut self, guard: Option<SharedMatcher<V>>, handler: Handler<V, R>) -> Self {
        if self.has_fallback() {
            tracing::warn!(
                index = self.arms.len(),
                "arm attached after an unconditional arm is unreachable"
            );
        }
        self.arms.push(Arc::new(Arm { guard, handler }));
        self
    }

    /// Number of arms in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arms.len()
    }

    /// Returns `true` if the chain has no arms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }

    /// Returns `true` if some arm is unconditional, so the chain always matches.
    #[must_use]
    pub fn has_fallback(&self) -> bool {
        self.arms.iter().any(|arm| arm.guard.is_none())
    }

    /// Indices of arms that can never be reached because an earlier arm is
    /// unconditional.
    ///
    /// Such arms are kept; this only reports them.
    #[must_use]
    pub fn unreachable_arms(&self) -> Vec<usize> {
        match self.arms.iter().position(|arm| arm.guard.is_none()) {
            Some(first) => (first + 1..self.arms.len()).collect(),
            None => Vec::new(),
        }
    }

    /// Names of each arm's guard, in evaluation order.
    pub fn guard_names(&self) -> impl Iterator<Item = String> + '_ {
        self.arms.iter().map(|arm| arm.guard_name())
    }

    // ── Composition ──────────────────────────────────────────────────────────

    /// Appends the arms of `other` after the arms of `self`.
    ///
    /// `a.or(b.or(c))` and `a.or(b).or(c)` are the same chain.
    #[must_use]
    pub fn or(mut self, other: Case<V, R>) -> Self {
        if self.has_fallback() && !other.is_empty() {
            tracing::warn!(
                index = self.arms.len(),
                count = other.len(),
                "arms attached after an unconditional arm are unreachable"
            );
        }
        self.arms.extend(other.arms);
        self
    }

    /// Appends a guarded arm. See [`case_when`].
    #[must_use]
    pub fn case_when<M, F>(self, matcher: M, handler: F) -> Self
    where
        M: TypeMatcher<V> + 'static,
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.push(Some(shared(matcher)), Handler::Map(Arc::new(handler)))
    }

    /// Appends a guarded arm with a fallible handler. See [`case_try`].
    #[must_use]
    pub fn case_try<M, F, E>(self, matcher: M, handler: F) -> Self
    where
        M: TypeMatcher<V> + 'static,
        F: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.push(Some(shared(matcher)), try_handler(handler))
    }

    /// Appends an unconditional arm. See [`case_any`].
    #[must_use]
    pub fn case_any<F>(self, handler: F) -> Self
    where
        F: Fn(&V) -> R + Send + Sync + 'static,
    {
        self.push(None, Handler::Map(Arc::new(handler)))
    }

    /// Appends an unconditional arm that ignores the value. See [`case_default`].
    #[must_use]
    pub fn case_default<F>(self, producer: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
    {
        self.push(None, Handler::Map(Arc::new(move |_: &V| producer())))
    }

    /// Appends an unconditional arm that raises `error`. See [`case_throw`].
    #[must_use]
    pub fn case_throw(self, error: impl Into<BoxError>) -> Self {
        self.push(None, Handler::Throw(Arc::from(error.into())))
    }

    // ── Evaluation ───────────────────────────────────────────────────────────

    /// Tries the arms in order.
    ///
    /// Returns `Ok(Unmatched)` when no guard accepts the value.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Raised`] when the first accepting arm's handler
    /// raises, when that arm is a `case_throw`, or when a guard built with
    /// [`fail_with`](crate::fail_with) misses.
    pub fn try_match(&self, value: &V) -> Result<CaseOutcome<R>, MatchError> {
        for (index, arm) in self.arms.iter().enumerate() {
            let matched = arm.accepts(value)?;
            tracing::trace!(index, guard = %arm.guard_name(), matched, "arm tested");
            if matched {
                return arm.handler.run(value).map(CaseOutcome::Matched);
            }
        }
        Ok(CaseOutcome::Unmatched)
    }

    /// Evaluates the chain, turning `Unmatched` into [`MatchError::NoMatch`].
    ///
    /// # Errors
    ///
    /// [`MatchError::NoMatch`] if no arm accepts the value, otherwise as
    /// [`try_match`](Self::try_match).
    pub fn evaluate(&self, value: &V) -> Result<R, MatchError> {
        match self.try_match(value)? {
            CaseOutcome::Matched(result) => Ok(result),
            CaseOutcome::Unmatched => {
                tracing::debug!(
                    input = std::any::type_name::<V>(),
                    arms = self.len(),
                    "no arm matched"
                );
                Err(MatchError::no_match::<V>())
            }
        }
    }

    /// Like [`try_match`](Self::try_match), but records every arm consulted.
    ///
    /// The recorded steps stop after the first accepting arm.
    pub fn evaluate_with_trace(&self, value: &V) -> EvalTrace<R> {
        let mut steps = Vec::new();
        for (index, arm) in self.arms.iter().enumerate() {
            let guard = arm.guard_name();
            let matched = match arm.accepts(value) {
                Ok(matched) => matched,
                Err(e) => {
                    steps.push(EvalStep {
                        index,
                        guard,
                        matched: false,
                    });
                    return EvalTrace {
                        outcome: Err(e),
                        steps,
                    };
                }
            };
            steps.push(EvalStep {
                index,
                guard,
                matched,
            });
            if matched {
                return EvalTrace {
                    outcome: arm.handler.run(value).map(CaseOutcome::Matched),
                    steps,
                };
            }
        }
        EvalTrace {
            outcome: Ok(CaseOutcome::Unmatched),
            steps,
        }
    }
}

impl<V: ?Sized + ToOwned> Case<V, V::Owned> {
    /// Appends an identity arm. See [`case_id`].
    #[must_use]
    pub fn case_id<M>(self, matcher: M) -> Self
    where
        M: TypeMatcher<V> + 'static,
    {
        self.push(Some(shared(matcher)), identity())
    }
}

fn try_handler<V, R, F, E>(handler: F) -> Handler<V, R>
where
    V: ?Sized,
    F: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Handler::Try(Arc::new(move |v: &V| handler(v).map_err(Into::into)))
}

fn identity<V: ?Sized + ToOwned>() -> Handler<V, V::Owned> {
    Handler::Map(Arc::new(|v: &V| v.to_owned()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════════════

/// A case that applies `handler` to values accepted by `matcher`.
///
/// The handler only runs after the matcher accepted the value.
pub fn case_when<V, R, M, F>(matcher: M, handler: F) -> Case<V, R>
where
    V: ?Sized,
    M: TypeMatcher<V> + 'static,
    F: Fn(&V) -> R + Send + Sync + 'static,
{
    Case::single(Some(shared(matcher)), Handler::Map(Arc::new(handler)))
}

/// A case that returns values accepted by `matcher` unchanged.
///
/// ```
/// use typematcher::{case_id, is_string, Value};
///
/// let strings = case_id(is_string());
/// assert_eq!(strings.evaluate(&Value::from("a")).unwrap(), Value::from("a"));
/// ```
pub fn case_id<V, M>(matcher: M) -> Case<V, V::Owned>
where
    V: ?Sized + ToOwned,
    M: TypeMatcher<V> + 'static,
{
    Case::single(Some(shared(matcher)), identity())
}

/// An unconditional case: `handler` receives every value.
pub fn case_any<V, R, F>(handler: F) -> Case<V, R>
where
    V: ?Sized,
    F: Fn(&V) -> R + Send + Sync + 'static,
{
    Case::single(None, Handler::Map(Arc::new(handler)))
}

/// An unconditional case producing a value without looking at the input.
pub fn case_default<V, R, F>(producer: F) -> Case<V, R>
where
    V: ?Sized,
    F: Fn() -> R + Send + Sync + 'static,
{
    Case::single(None, Handler::Map(Arc::new(move |_: &V| producer())))
}

/// An unconditional case that raises `error` when reached.
///
/// Building the case never raises. Every evaluation that reaches it raises
/// the same shared error object.
pub fn case_throw<V, R>(error: impl Into<BoxError>) -> Case<V, R>
where
    V: ?Sized,
{
    Case::single(None, Handler::Throw(Arc::from(error.into())))
}

/// A case with a fallible handler. An `Err` from the handler surfaces as
/// [`MatchError::Raised`], unmodified.
///
/// ```
/// use typematcher::{case_try, is_string, Value};
///
/// let parse = case_try(is_string(), |v: &Value| {
///     v.as_str().unwrap_or_default().parse::<i64>()
/// });
///
/// assert_eq!(parse.evaluate(&Value::from("12")).unwrap(), 12);
/// let err = parse.evaluate(&Value::from("twelve")).unwrap_err();
/// assert!(err.downcast_ref::<std::num::ParseIntError>().is_some());
/// ```
pub fn case_try<V, R, M, F, E>(matcher: M, handler: F) -> Case<V, R>
where
    V: ?Sized,
    M: TypeMatcher<V> + 'static,
    F: Fn(&V) -> Result<R, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Case::single(Some(shared(matcher)), try_handler(handler))
}
