//! typematcher - Runtime type matchers and a first-match-wins case DSL
//!
//! Two layers:
//!
//! - [`TypeMatcher<V>`]: pure predicates answering "does this value have
//!   the shape I expect?". Any `Fn(&V) -> bool` closure is one; a library of
//!   matchers over the dynamic [`Value`] type ships in [`matchers`].
//! - [`Case<V, R>`]: guarded handlers chained into an ordered list. The
//!   [match engine](match_value) dispatches a value to the first arm whose
//!   guard accepts it, or fails with [`MatchError::NoMatch`].
//!
//! # Key Design Insights
//!
//! 1. **Composition is concatenation**: a chain is a flat list of arms, so
//!    `a.or(b.or(c))` and `a.or(b).or(c)` try the same arms in the same order.
//!
//! 2. **Deferral is a value**: an arm that does not apply yields
//!    [`CaseOutcome::Unmatched`]. Errors are reserved for real failures.
//!
//! 3. **Raised errors are untouched**: whatever a handler, a `case_throw` or a
//!    `fail_with` matcher raises reaches the caller as the same `Arc`.
//!
//! # Example
//!
//! ```
//! use typematcher::prelude::*;
//!
//! let to_number = case_when(is_value("one"), |_: &Value| 1)
//!     .case_when(is_value("two"), |_: &Value| 2)
//!     .case_when(is_number(), |v: &Value| v.as_f64().unwrap_or_default() as i32);
//!
//! assert_eq!(match_value(&Value::from("two"), &to_number).unwrap(), 2);
//! assert_eq!(match_value(&Value::from(7), &to_number).unwrap(), 7);
//! assert!(match_value(&Value::from("x"), &to_number)
//!     .unwrap_err()
//!     .is_no_match());
//! ```
//!
//! # Configuration
//!
//! With the `registry` feature, cases can be loaded from YAML/JSON through
//! [`Registry::load_case`]; see the `typematcher-test` crate for fixtures.

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod case;
mod combinators;
mod engine;
pub mod matchers;
mod trace;
mod type_matcher;
mod value;

#[cfg(feature = "registry")]
mod config;
#[cfg(feature = "registry")]
mod registry;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use case::{
    case_any, case_default, case_id, case_throw, case_try, case_when, Case, CaseOutcome,
};
pub use engine::{match_on, match_value, match_with, MatchOn};
pub use type_matcher::{shared, Erased, SharedMatcher, TypeMatcher};
pub use value::{CustomValue, Value};

// Generic combinators
pub use combinators::{
    all_of, any_of, fail_with, is_any, is_both, is_either, is_never, refined, AllOf, AnyOf, Both,
    Either, FailWith, IsAny, IsNever, Refined,
};

// Value matchers
pub use matchers::{
    has_fields, is_array_of, is_boolean, is_finite_number, is_instance_of, is_literal, is_missing,
    is_null, is_nullable, is_number, is_object, is_object_map_of, is_optional, is_string,
    is_tuple, is_undefined, is_value, matches_pattern,
};

// Trace types
pub use trace::{EvalStep, EvalTrace};

// Registry (feature-gated)
#[cfg(feature = "registry")]
pub use config::{ArmConfig, CaseConfig, MatcherConfig, OnMatchConfig};
#[cfg(feature = "registry")]
pub use registry::{register_core_matchers, IntoMatcher, Registry, RegistryBuilder};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use typematcher::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Case DSL
        case_any,
        case_default,
        case_id,
        case_throw,
        case_try,
        case_when,
        // Matchers
        fail_with,
        has_fields,
        is_any,
        is_array_of,
        is_boolean,
        is_both,
        is_either,
        is_finite_number,
        is_instance_of,
        is_literal,
        is_missing,
        is_never,
        is_null,
        is_nullable,
        is_number,
        is_object,
        is_object_map_of,
        is_optional,
        is_string,
        is_tuple,
        is_undefined,
        is_value,
        // Engine
        match_on,
        match_value,
        match_with,
        matches_pattern,
        refined,
        shared,
        Case,
        CaseOutcome,
        // Errors
        ConfigError,
        CustomValue,
        Erased,
        // Trace types
        EvalStep,
        EvalTrace,
        MatchError,
        SharedMatcher,
        // Traits
        TypeMatcher,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for nested matcher configs.
///
/// Protects the config loader against stack overflow from deeply nested
/// `all`/`any`/`has_fields` entries.
pub const MAX_DEPTH: usize = 32;

/// Maximum number of arms in a loaded case.
pub const MAX_CASES: usize = 256;

/// Maximum number of children in a single compound matcher config
/// (`all`, `any`, `tuple`, `has_fields`).
///
/// Same width-based protection as [`MAX_CASES`], applied to compound children.
pub const MAX_MATCHERS_PER_COMPOUND: usize = 256;

/// Maximum length for regex patterns.
///
/// Regex compilation is expensive even with the linear-time Rust `regex` crate.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Owned error raised by handlers and failing matchers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared form of [`BoxError`], as carried by [`MatchError::Raised`].
pub type SharedError = std::sync::Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from evaluating a case chain.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// No arm accepted the value.
    ///
    /// The engine only knows the input's type. Callers whose input is
    /// `Debug` can attach the value itself with [`MatchError::with_value`].
    #[error("No match: {}", unmatched(.type_name, .value))]
    NoMatch {
        /// Type name of the unmatched input.
        type_name: &'static str,
        /// The unmatched value in `Debug` format, when attached.
        value: Option<String>,
    },
    /// A handler, a `case_throw` arm or a `fail_with` matcher raised.
    ///
    /// The error is passed through unmodified.
    #[error(transparent)]
    Raised(SharedError),
}

impl MatchError {
    /// Wraps any error as [`MatchError::Raised`].
    pub fn raised(error: impl Into<BoxError>) -> Self {
        Self::Raised(std::sync::Arc::from(error.into()))
    }

    pub(crate) fn no_match<V: ?Sized>() -> Self {
        Self::NoMatch {
            type_name: std::any::type_name::<V>(),
            value: None,
        }
    }

    /// Attaches the unmatched value to a [`MatchError::NoMatch`].
    ///
    /// Raised errors are returned unchanged.
    ///
    /// ```
    /// use typematcher::{case_when, is_number, Value};
    ///
    /// let case = case_when(is_number(), |_: &Value| 0);
    /// let input = Value::from("x");
    /// let err = case.evaluate(&input).map_err(|e| e.with_value(&input)).unwrap_err();
    /// assert_eq!(err.to_string(), "No match: String(\"x\")");
    /// ```
    #[must_use]
    pub fn with_value<V: std::fmt::Debug + ?Sized>(self, value: &V) -> Self {
        match self {
            Self::NoMatch { type_name, .. } => Self::NoMatch {
                type_name,
                value: Some(format!("{value:?}")),
            },
            raised @ Self::Raised(_) => raised,
        }
    }

    /// Returns `true` for [`MatchError::NoMatch`].
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }

    /// Returns the raised error, if any.
    #[must_use]
    pub fn as_raised(&self) -> Option<&SharedError> {
        match self {
            Self::Raised(e) => Some(e),
            Self::NoMatch { .. } => None,
        }
    }

    /// Downcasts the raised error to a concrete type.
    #[must_use]
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.as_raised().and_then(|e| e.downcast_ref::<E>())
    }
}

/// Errors from matcher construction and config loading.
///
/// These errors are caught at load time, not evaluation time.
/// Fix the configuration and load it again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Matcher nesting exceeds [`MAX_DEPTH`].
    #[error(
        "matcher nesting depth is {depth}, but maximum allowed is {max}; \
         reduce nesting or flatten the matcher"
    )]
    DepthExceeded {
        /// Actual depth of the matcher config.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// A regex pattern is invalid.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },
    /// Configuration deserialization or construction failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },
    /// A named matcher was not found in the registry.
    #[error("unknown matcher \"{name}\"{}", registered_suffix(.available))]
    UnknownMatcher {
        /// The unregistered name.
        name: String,
        /// Names that ARE registered, sorted.
        available: Vec<String>,
    },
    /// Too many arms, or too many children in a compound matcher.
    #[error("config has {count} entries, but maximum allowed is {max}")]
    TooManyCases {
        /// Actual count.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A regex pattern exceeds [`MAX_REGEX_PATTERN_LENGTH`].
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}

fn unmatched(type_name: &str, value: &Option<String>) -> String {
    match value {
        Some(value) => value.clone(),
        None => format!("value of type `{type_name}`"),
    }
}

fn registered_suffix(available: &[String]) -> String {
    if available.is_empty() {
        " (no matchers are registered)".to_owned()
    } else {
        format!(" (registered: {})", available.join(", "))
    }
}
