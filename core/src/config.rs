//! Config types for declarative case construction.
//!
//! These types mirror the runtime case and matcher types but are
//! serde-deserializable, enabling config-driven case construction via
//! [`Registry::load_case()`](crate::Registry::load_case).
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader method |
//! |-------------|-------------|---------------|
//! | [`CaseConfig`] | [`Case<Value, A>`](crate::Case) | `Registry::load_case()` |
//! | [`ArmConfig`] | one arm of a `Case` | `Registry::load_case()` |
//! | [`MatcherConfig`] | [`SharedMatcher<Value>`](crate::SharedMatcher) | `Registry::load_matcher()` |
//! | [`OnMatchConfig`] | handler of an arm | `Registry::load_case()` |

use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration for a [`Case<Value, A>`](crate::Case).
///
/// ```yaml
/// cases:
///   - when: { type: literal, value: "one" }
///     then: { type: action, action: 1 }
///   - when: { type: named, name: is_number }
///     then: { type: action, action: 0 }
/// on_no_match: { type: throw, message: "unsupported" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct CaseConfig<A> {
    /// Arms to try in order (first-match-wins).
    pub cases: Vec<ArmConfig<A>>,

    /// Unconditional arm appended after `cases`.
    #[serde(default)]
    pub on_no_match: Option<OnMatchConfig<A>>,
}

/// Configuration for one guarded arm.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub struct ArmConfig<A> {
    /// The guard.
    pub when: MatcherConfig,

    /// What to do when the guard accepts.
    pub then: OnMatchConfig<A>,
}

/// Configuration for a matcher over [`Value`](crate::Value).
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization:
///
/// ```json
/// { "type": "named", "name": "is_string" }
/// { "type": "literal", "value": 42 }
/// { "type": "has_fields", "fields": { "id": { "type": "named", "name": "is_number" } } }
/// { "type": "any", "matchers": [...] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum MatcherConfig {
    /// A matcher registered under a name.
    #[serde(rename = "named")]
    Named {
        /// Registered name, e.g. `"is_string"`.
        name: String,
        /// Payload for configurable matchers, `null` when absent.
        #[serde(default)]
        config: serde_json::Value,
    },

    /// Strict equality with a literal.
    #[serde(rename = "literal")]
    Literal {
        /// The expected value.
        value: serde_json::Value,
    },

    /// Objects whose named fields match.
    #[serde(rename = "has_fields")]
    HasFields {
        /// Field name to matcher.
        fields: BTreeMap<String, MatcherConfig>,
    },

    /// Arrays whose items all match.
    #[serde(rename = "array_of")]
    ArrayOf {
        /// Matcher for each item.
        items: Box<MatcherConfig>,
    },

    /// Objects whose field values all match.
    #[serde(rename = "object_map_of")]
    ObjectMapOf {
        /// Matcher for each field value.
        values: Box<MatcherConfig>,
    },

    /// Fixed-length arrays matched by position.
    #[serde(rename = "tuple")]
    Tuple {
        /// One matcher per position.
        items: Vec<MatcherConfig>,
    },

    /// All matchers must accept (logical AND).
    #[serde(rename = "all")]
    All {
        /// Child matchers.
        matchers: Vec<MatcherConfig>,
    },

    /// Any matcher must accept (logical OR).
    #[serde(rename = "any")]
    Any {
        /// Child matchers.
        matchers: Vec<MatcherConfig>,
    },

    /// `undefined` or the inner match.
    #[serde(rename = "optional")]
    Optional {
        /// The inner matcher.
        matcher: Box<MatcherConfig>,
    },

    /// `null` or the inner match.
    #[serde(rename = "nullable")]
    Nullable {
        /// The inner matcher.
        matcher: Box<MatcherConfig>,
    },

    /// Strings matching a regular expression.
    #[serde(rename = "pattern")]
    Pattern {
        /// The regex source.
        regex: String,
    },

    /// Raise `message` instead of answering `false`.
    #[serde(rename = "fail_with")]
    FailWith {
        /// The inner matcher.
        matcher: Box<MatcherConfig>,
        /// Message of the raised error.
        message: String,
    },
}

impl MatcherConfig {
    /// Nesting depth of this config (a leaf is depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        let children = match self {
            Self::Named { .. } | Self::Literal { .. } | Self::Pattern { .. } => return 1,
            Self::HasFields { fields } => fields.values().map(Self::depth).max(),
            Self::ArrayOf { items: inner }
            | Self::ObjectMapOf { values: inner }
            | Self::Optional { matcher: inner }
            | Self::Nullable { matcher: inner }
            | Self::FailWith { matcher: inner, .. } => Some(inner.depth()),
            Self::Tuple { items: list }
            | Self::All { matchers: list }
            | Self::Any { matchers: list } => list.iter().map(Self::depth).max(),
        };
        1 + children.unwrap_or(0)
    }
}

/// Configuration for what an arm does once its guard accepts.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
#[serde(bound(deserialize = "A: Deserialize<'de>"))]
pub enum OnMatchConfig<A> {
    /// Return this action.
    #[serde(rename = "action")]
    Action {
        /// The action value.
        action: A,
    },

    /// Raise an error with this message.
    #[serde(rename = "throw")]
    Throw {
        /// The error message.
        message: String,
    },
}
