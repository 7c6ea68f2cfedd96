//! Conformance fixture runner.
//!
//! Loads YAML fixtures that use the **registry config format** (the same
//! shape as `CaseConfig<serde_json::Value>`) and runs them through the
//! production loading pipeline:
//! YAML → `CaseConfig` → `Registry::load_case()` → evaluate.
//!
//! ```yaml
//! name: literal_dispatch
//! config:
//!   cases:
//!     - when: { type: literal, value: "two" }
//!       then: { type: action, action: 2 }
//! cases:
//!   - name: hit
//!     input: "two"
//!     expect: 2
//!   - name: miss
//!     input: "x"
//!     expect_no_match: true
//! ```

use serde::Deserialize;
use typematcher::{CaseConfig, MatchError, Registry, Value};

/// A conformance test fixture.
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw config, deserialized as `CaseConfig<serde_json::Value>`.
    pub config: serde_json::Value,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    /// The config itself must fail to parse or load.
    #[serde(default)]
    pub expect_error: bool,
}

/// A test case within a fixture.
///
/// Exactly one of `expect`, `expect_error` or `expect_no_match` is checked,
/// in that order of precedence.
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// Input value; absent means `undefined`, `null` means null.
    #[serde(default, deserialize_with = "present")]
    pub input: Option<serde_json::Value>,
    /// Expected action.
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    /// Expected message of a raised error.
    #[serde(default)]
    pub expect_error: Option<String>,
    /// Expect `NoMatch`.
    #[serde(default)]
    pub expect_no_match: bool,
}

/// Keeps an explicit `null` as `Some(Null)`; only an absent key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl TestCase {
    /// Build the input [`Value`].
    #[must_use]
    pub fn build_input(&self) -> Value {
        self.input.clone().map_or(Value::Undefined, Value::from)
    }

    fn expected(&self) -> Expected {
        if let Some(action) = &self.expect {
            Expected::Action(action.clone())
        } else if let Some(message) = &self.expect_error {
            Expected::Error(message.clone())
        } else {
            Expected::NoMatch
        }
    }
}

/// What a test case expects to happen.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Action(serde_json::Value),
    Error(String),
    NoMatch,
}

impl Expected {
    fn from_result(result: Result<serde_json::Value, MatchError>) -> Self {
        match result {
            Ok(action) => Self::Action(action),
            Err(MatchError::NoMatch { .. }) => Self::NoMatch,
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Test result for a single case.
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Expected,
    pub actual: Expected,
}

impl Fixture {
    /// Parse a single fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Parse and load the config.
    ///
    /// # Errors
    ///
    /// Returns the parse or load error message.
    pub fn load(
        &self,
        registry: &Registry,
    ) -> Result<typematcher::Case<Value, serde_json::Value>, String> {
        let config: CaseConfig<serde_json::Value> =
            serde_json::from_value(self.config.clone()).map_err(|e| e.to_string())?;
        registry.load_case(config).map_err(|e| e.to_string())
    }

    /// Run all test cases and return results.
    ///
    /// # Errors
    ///
    /// Returns the load error message if the config does not load.
    pub fn run(&self, registry: &Registry) -> Result<Vec<CaseResult>, String> {
        let case = self.load(registry)?;
        Ok(self
            .cases
            .iter()
            .map(|tc| {
                let expected = tc.expected();
                let actual = Expected::from_result(case.evaluate(&tc.build_input()));
                CaseResult {
                    case_name: tc.name.clone(),
                    passed: actual == expected,
                    expected,
                    actual,
                }
            })
            .collect())
    }

    /// Run the fixture and panic on the first failure.
    ///
    /// Error fixtures pass when the config fails to parse or load.
    pub fn run_and_assert(&self, registry: &Registry) {
        if self.expect_error {
            assert!(
                self.load(registry).is_err(),
                "Fixture '{}' expected a config error but loaded",
                self.name
            );
            return;
        }

        let results = self
            .run(registry)
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?}",
                self.name, result.case_name, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        crate::register(typematcher::RegistryBuilder::new()).build()
    }

    #[test]
    fn test_parse_and_run() {
        let yaml = r#"
name: literal
config:
  cases:
    - when: { type: literal, value: "two" }
      then: { type: action, action: 2 }
cases:
  - name: hit
    input: "two"
    expect: 2
  - name: miss
    input: "x"
    expect_no_match: true
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        let results = fixture.run(&registry()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
    }

    #[test]
    fn test_wrong_expectation_fails() {
        let yaml = r#"
name: wrong
config:
  cases: []
  on_no_match: { type: action, action: "a" }
cases:
  - name: expects_b
    input: 1
    expect: "b"
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        let results = fixture.run(&registry()).unwrap();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, Expected::Action(serde_json::json!("a")));
    }

    #[test]
    fn test_absent_input_is_undefined() {
        let tc = TestCase {
            name: "t".into(),
            input: None,
            expect: None,
            expect_error: None,
            expect_no_match: true,
        };
        assert!(tc.build_input().is_undefined());
    }

    #[test]
    fn test_explicit_null_input() {
        let tc: TestCase = serde_yaml::from_str("name: n\ninput: null\n").unwrap();
        assert!(tc.build_input().is_null());

        let tc: TestCase = serde_yaml::from_str("name: u\n").unwrap();
        assert!(tc.build_input().is_undefined());
    }

    #[test]
    fn test_multi_document() {
        let yaml = r#"
name: one
config: { cases: [] }
---
name: two
config: { cases: [] }
"#;
        let fixtures = Fixture::from_yaml_multi(yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[1].name, "two");
    }
}
