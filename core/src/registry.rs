//! Matcher registry for config-driven case construction.
//!
//! The registry enables **generic config loading**: JSON/YAML config ->
//! compiled `Case<Value, A>` without hand-written glue code.
//!
//! # Two kinds of named matchers
//!
//! | Kind | Registration | Config |
//! |------|--------------|--------|
//! | Fixed | `builder.matcher(name, m)` | `{ type: named, name }` |
//! | Configurable | `builder.factory::<T>(name)` | `{ type: named, name, config }` |
//!
//! Configurable matchers implement [`IntoMatcher`]. At registration time the
//! concrete type `T` is monomorphized into a closure and erased behind
//! `Box<dyn Fn>`; the payload is deserialized into `T::Config` at load time.
//!
//! Structural matchers (`literal`, `has_fields`, `tuple`, ...) need no
//! registration: they are built into [`MatcherConfig`].
//!
//! # Example
//!
//! ```
//! use typematcher::{register_core_matchers, CaseConfig, RegistryBuilder, Value};
//!
//! let registry = register_core_matchers(RegistryBuilder::new()).build();
//!
//! let config: CaseConfig<String> = serde_json::from_value(serde_json::json!({
//!     "cases": [
//!         { "when": { "type": "named", "name": "is_string" },
//!           "then": { "type": "action", "action": "string" } }
//!     ],
//!     "on_no_match": { "type": "action", "action": "other" }
//! }))
//! .unwrap();
//!
//! let case = registry.load_case(config).unwrap();
//! assert_eq!(case.evaluate(&Value::from("hi")).unwrap(), "string");
//! assert_eq!(case.evaluate(&Value::from(1)).unwrap(), "other");
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::{
    case_default, case_throw,
    config::{ArmConfig, CaseConfig, MatcherConfig, OnMatchConfig},
    fail_with, has_fields, is_array_of, is_nullable, is_object_map_of, is_optional, is_tuple,
    is_value, matches_pattern, shared, Case, ConfigError, Erased, SharedMatcher, TypeMatcher,
    Value, MAX_CASES, MAX_DEPTH, MAX_MATCHERS_PER_COMPOUND,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Traits
// ═══════════════════════════════════════════════════════════════════════════════

/// Trait for matchers that can be constructed from configuration.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use typematcher::{refined, is_finite_number, shared, ConfigError, IntoMatcher, SharedMatcher, Value};
///
/// struct AtLeast;
///
/// #[derive(Deserialize)]
/// struct AtLeastConfig {
///     min: f64,
/// }
///
/// impl IntoMatcher for AtLeast {
///     type Config = AtLeastConfig;
///
///     fn from_config(config: Self::Config) -> Result<SharedMatcher<Value>, ConfigError> {
///         let min = config.min;
///         Ok(shared(refined(is_finite_number(), "AtLeast", move |v: &Value| {
///             v.as_f64().is_some_and(|n| n >= min)
///         })))
///     }
/// }
/// ```
pub trait IntoMatcher: Send + Sync + 'static {
    /// The configuration type deserialized from JSON/YAML.
    type Config: DeserializeOwned + Send + Sync;

    /// Construct a matcher from deserialized configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] if the config is semantically invalid.
    fn from_config(config: Self::Config) -> Result<SharedMatcher<Value>, ConfigError>;
}

/// Type-erased matcher factory closure.
type BoxedMatcherFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<SharedMatcher<Value>, ConfigError> + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for constructing a [`Registry`].
///
/// Register named matchers, then call [`build()`](Self::build) to produce an
/// immutable `Registry`. No runtime registration is possible after that.
pub struct RegistryBuilder {
    factories: HashMap<String, BoxedMatcherFactory>,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a fixed matcher under `name`.
    ///
    /// Any `config` payload given alongside the name is ignored.
    #[must_use]
    pub fn matcher(mut self, name: &str, matcher: impl TypeMatcher<Value> + 'static) -> Self {
        let matcher = shared(matcher);
        self.factories.insert(
            name.to_owned(),
            Box::new(move |_: &serde_json::Value| Ok(SharedMatcher::clone(&matcher))),
        );
        self
    }

    /// Register a configurable matcher type under `name`.
    ///
    /// At load time, the registry deserializes the `config` payload as
    /// `T::Config` and calls `T::from_config()`.
    #[must_use]
    pub fn factory<T: IntoMatcher>(mut self, name: &str) -> Self {
        self.factories.insert(
            name.to_owned(),
            Box::new(|value: &serde_json::Value| {
                let config: T::Config = serde_json::from_value(value.clone()).map_err(|e| {
                    ConfigError::InvalidConfig {
                        reason: e.to_string(),
                    }
                })?;
                T::from_config(config)
            }),
        );
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Register the built-in named matchers.
///
/// | Name | Matcher |
/// |------|---------|
/// | `is_any`, `is_never` | constants |
/// | `is_string`, `is_number`, `is_finite_number`, `is_boolean` | primitives |
/// | `is_object`, `is_null`, `is_undefined`, `is_missing` | shapes |
///
/// Domain crates call this first and add their own names on top.
#[must_use]
pub fn register_core_matchers(builder: RegistryBuilder) -> RegistryBuilder {
    use crate::matchers::{
        is_boolean, is_finite_number, is_missing, is_null, is_number, is_object, is_string,
        is_undefined,
    };
    use crate::{IsAny, IsNever};

    builder
        .matcher("is_any", IsAny)
        .matcher("is_never", IsNever)
        .matcher("is_string", is_string())
        .matcher("is_number", is_number())
        .matcher("is_finite_number", is_finite_number())
        .matcher("is_boolean", is_boolean())
        .matcher("is_object", is_object())
        .matcher("is_null", is_null())
        .matcher("is_undefined", is_undefined())
        .matcher("is_missing", is_missing())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable registry of named matcher factories.
///
/// Constructed via [`RegistryBuilder`]. Use [`load_case()`](Self::load_case)
/// to compile config into a runtime [`Case`].
pub struct Registry {
    factories: HashMap<String, BoxedMatcherFactory>,
}

impl Registry {
    /// Load a `Case` from configuration.
    ///
    /// Each arm becomes a guarded arm in config order; `on_no_match` becomes
    /// a trailing unconditional arm.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::TooManyCases`]: more than [`MAX_CASES`] arms, or a
    ///   compound matcher with more than [`MAX_MATCHERS_PER_COMPOUND`] children
    /// - [`ConfigError::UnknownMatcher`]: a `named` matcher is not registered
    /// - [`ConfigError::InvalidConfig`]: a matcher payload failed to deserialize
    /// - [`ConfigError::InvalidPattern`] / [`ConfigError::PatternTooLong`]: bad regex
    /// - [`ConfigError::DepthExceeded`]: matcher nesting exceeds [`MAX_DEPTH`]
    pub fn load_case<A>(&self, config: CaseConfig<A>) -> Result<Case<Value, A>, ConfigError>
    where
        A: Clone + Send + Sync + 'static,
    {
        if config.cases.len() > MAX_CASES {
            return Err(ConfigError::TooManyCases {
                count: config.cases.len(),
                max: MAX_CASES,
            });
        }
        let mut case = Case::empty();
        for arm in config.cases {
            case = case.or(self.load_arm(arm)?);
        }
        if let Some(on_no_match) = config.on_no_match {
            let fallback = match on_no_match {
                OnMatchConfig::Action { action } => case_default(move || action.clone()),
                OnMatchConfig::Throw { message } => case_throw(ThrownError { message }),
            };
            case = case.or(fallback);
        }
        tracing::debug!(arms = case.len(), "loaded case");
        Ok(case)
    }

    /// Load a single matcher from configuration.
    ///
    /// # Errors
    ///
    /// As [`load_case()`](Self::load_case), minus the arm count limit.
    pub fn load_matcher(&self, config: MatcherConfig) -> Result<SharedMatcher<Value>, ConfigError> {
        let depth = config.depth();
        if depth > MAX_DEPTH {
            return Err(ConfigError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        self.compile(config)
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Returns `true` if the given matcher name is registered.
    #[must_use]
    pub fn contains_matcher(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns all registered matcher names (sorted).
    #[must_use]
    pub fn matcher_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn load_arm<A>(&self, config: ArmConfig<A>) -> Result<Case<Value, A>, ConfigError>
    where
        A: Clone + Send + Sync + 'static,
    {
        let guard = Erased(self.load_matcher(config.when)?);
        Ok(match config.then {
            OnMatchConfig::Action { action } => {
                crate::case_when(guard, move |_: &Value| action.clone())
            }
            OnMatchConfig::Throw { message } => crate::case_try(guard, move |_: &Value| {
                Err::<A, _>(ThrownError {
                    message: message.clone(),
                })
            }),
        })
    }

    fn compile(&self, config: MatcherConfig) -> Result<SharedMatcher<Value>, ConfigError> {
        match config {
            MatcherConfig::Named { name, config } => {
                let factory = self.factories.get(&name).ok_or_else(|| {
                    ConfigError::UnknownMatcher {
                        name: name.clone(),
                        available: self.matcher_names().into_iter().map(str::to_owned).collect(),
                    }
                })?;
                factory(&config)
            }
            MatcherConfig::Literal { value } => Ok(shared(is_value(Value::from(value)))),
            MatcherConfig::HasFields { fields } => {
                check_width(fields.len())?;
                let fields = fields
                    .into_iter()
                    .map(|(k, m)| Ok((k, self.compile(m)?)))
                    .collect::<Result<Vec<_>, ConfigError>>()?;
                Ok(shared(has_fields(fields)))
            }
            MatcherConfig::ArrayOf { items } => {
                Ok(shared(is_array_of(Erased(self.compile(*items)?))))
            }
            MatcherConfig::ObjectMapOf { values } => {
                Ok(shared(is_object_map_of(Erased(self.compile(*values)?))))
            }
            MatcherConfig::Tuple { items } => {
                check_width(items.len())?;
                Ok(shared(is_tuple(self.compile_all(items)?)))
            }
            MatcherConfig::All { matchers } => {
                check_width(matchers.len())?;
                Ok(shared(crate::all_of(self.compile_all(matchers)?)))
            }
            MatcherConfig::Any { matchers } => {
                check_width(matchers.len())?;
                Ok(shared(crate::any_of(self.compile_all(matchers)?)))
            }
            MatcherConfig::Optional { matcher } => {
                Ok(shared(is_optional(Erased(self.compile(*matcher)?))))
            }
            MatcherConfig::Nullable { matcher } => {
                Ok(shared(is_nullable(Erased(self.compile(*matcher)?))))
            }
            MatcherConfig::Pattern { regex } => Ok(shared(matches_pattern(&regex)?)),
            MatcherConfig::FailWith { matcher, message } => {
                let inner = Erased(self.compile(*matcher)?);
                Ok(shared(fail_with(message, inner)))
            }
        }
    }

    fn compile_all(
        &self,
        configs: Vec<MatcherConfig>,
    ) -> Result<Vec<SharedMatcher<Value>>, ConfigError> {
        configs.into_iter().map(|c| self.compile(c)).collect()
    }
}

fn check_width(count: usize) -> Result<(), ConfigError> {
    if count > MAX_MATCHERS_PER_COMPOUND {
        return Err(ConfigError::TooManyCases {
            count,
            max: MAX_MATCHERS_PER_COMPOUND,
        });
    }
    Ok(())
}

/// Error raised by `throw` arms loaded from config.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct ThrownError {
    message: String,
}
