//! typematcher-test: Test domain for conformance testing
//!
//! Provides call-recording probes for checking evaluation order, a couple of
//! configurable matchers for the registry, and (feature `fixtures`) a YAML
//! fixture runner.
//!
//! # Example
//!
//! ```
//! use typematcher_test::prelude::*;
//!
//! let log = CallLog::new();
//! let case = case_when(log.guard("a", |n: &i64| *n > 10), log.handler("a", |_: &i64| "big"))
//!     .case_when(log.guard("b", |_: &i64| true), log.handler("b", |_: &i64| "small"));
//!
//! assert_eq!(case.evaluate(&3).unwrap(), "small");
//! assert_eq!(log.calls(), ["guard:a", "guard:b", "handler:b"]);
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use typematcher::TypeMatcher;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Call recording
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared, ordered log of guard and handler invocations.
///
/// Cloning a `CallLog` shares the underlying log.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, entry: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }

    /// Snapshot of the recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded calls whose entry equals `entry`.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.calls().iter().filter(|c| *c == entry).count()
    }

    /// Forget all recorded calls.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Wraps a matcher so that each call is logged as `guard:{label}`.
    pub fn guard<M>(&self, label: &str, matcher: M) -> Probe<M> {
        Probe {
            log: self.clone(),
            label: format!("guard:{label}"),
            inner: matcher,
        }
    }

    /// Wraps a handler so that each call is logged as `handler:{label}`.
    pub fn handler<V, R, F>(&self, label: &str, handler: F) -> impl Fn(&V) -> R + Send + Sync
    where
        V: ?Sized,
        F: Fn(&V) -> R + Send + Sync,
    {
        let log = self.clone();
        let label = format!("handler:{label}");
        move |value: &V| {
            log.record(label.clone());
            handler(value)
        }
    }
}

/// A matcher that logs each consultation. See [`CallLog::guard`].
pub struct Probe<M> {
    log: CallLog,
    label: String,
    inner: M,
}

impl<V, M> TypeMatcher<V> for Probe<M>
where
    V: ?Sized,
    M: TypeMatcher<V>,
{
    fn test(&self, value: &V) -> bool {
        self.log.record(self.label.clone());
        self.inner.test(value)
    }

    fn check(&self, value: &V) -> Result<bool, typematcher::MatchError> {
        self.log.record(self.label.clone());
        self.inner.check(value)
    }

    fn name(&self) -> String {
        self.label.clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry support (feature = "registry")
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "registry")]
mod configurable {
    use serde::Deserialize;
    use typematcher::{
        is_finite_number, refined, shared, ConfigError, IntoMatcher, SharedMatcher, Value,
    };

    /// Numbers that are a multiple of `divisor`.
    pub struct DivisibleBy;

    /// Configuration for [`DivisibleBy`].
    #[derive(Debug, Deserialize)]
    pub struct DivisibleByConfig {
        /// Must be non-zero.
        pub divisor: f64,
    }

    impl IntoMatcher for DivisibleBy {
        type Config = DivisibleByConfig;

        fn from_config(config: Self::Config) -> Result<SharedMatcher<Value>, ConfigError> {
            if config.divisor == 0.0 || !config.divisor.is_finite() {
                return Err(ConfigError::InvalidConfig {
                    reason: format!("divisor must be finite and non-zero, got {}", config.divisor),
                });
            }
            let divisor = config.divisor;
            Ok(shared(refined(
                is_finite_number(),
                format!("DivisibleBy({divisor})"),
                move |v: &Value| v.as_f64().is_some_and(|n| n % divisor == 0.0),
            )))
        }
    }

    /// Strings of at least `min` characters.
    pub struct MinLength;

    /// Configuration for [`MinLength`].
    #[derive(Debug, Deserialize)]
    pub struct MinLengthConfig {
        /// Minimum number of characters.
        pub min: usize,
    }

    impl IntoMatcher for MinLength {
        type Config = MinLengthConfig;

        fn from_config(config: Self::Config) -> Result<SharedMatcher<Value>, ConfigError> {
            let min = config.min;
            Ok(shared(move |v: &Value| {
                v.as_str().is_some_and(|s| s.chars().count() >= min)
            }))
        }
    }
}

#[cfg(feature = "registry")]
pub use configurable::{DivisibleBy, DivisibleByConfig, MinLength, MinLengthConfig};

/// Register core matchers plus the test-domain configurable matchers:
/// - `divisible_by` → [`DivisibleBy`]
/// - `min_length` → [`MinLength`]
#[cfg(feature = "registry")]
#[must_use]
pub fn register(builder: typematcher::RegistryBuilder) -> typematcher::RegistryBuilder {
    typematcher::register_core_matchers(builder)
        .factory::<DivisibleBy>("divisible_by")
        .factory::<MinLength>("min_length")
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{CallLog, Probe};
    pub use typematcher::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use typematcher::{case_when, fail_with, Value};

    #[test]
    fn test_log_records_in_order() {
        let log = CallLog::new();
        let guard = log.guard("g", |v: &i64| *v > 0);
        assert!(guard.test(&1));
        assert!(!guard.test(&-1));
        assert_eq!(log.calls(), ["guard:g", "guard:g"]);
        assert_eq!(log.count("guard:g"), 2);

        log.clear();
        assert!(log.calls().is_empty());
    }

    #[test]
    fn test_probe_forwards_check() {
        let log = CallLog::new();
        let guard = log.guard("strict", fail_with("not positive", |v: &i64| *v > 0));
        let err = guard.check(&-1).unwrap_err();
        assert_eq!(err.to_string(), "not positive");
        assert_eq!(log.calls(), ["guard:strict"]);
    }

    #[test]
    fn test_handler_not_called_on_miss() {
        let log = CallLog::new();
        let case = case_when(
            log.guard("s", typematcher::is_string()),
            log.handler("s", |_: &Value| 1),
        );
        assert!(case.evaluate(&Value::from(1)).is_err());
        assert_eq!(log.count("handler:s"), 0);
        assert_eq!(case.evaluate(&Value::from("x")).unwrap(), 1);
        assert_eq!(log.count("handler:s"), 1);
    }

    #[cfg(feature = "registry")]
    #[test]
    fn test_register_adds_domain_matchers() {
        let registry = register(typematcher::RegistryBuilder::new()).build();
        assert!(registry.contains_matcher("divisible_by"));
        assert!(registry.contains_matcher("min_length"));
        assert!(registry.contains_matcher("is_string"));
    }
}
