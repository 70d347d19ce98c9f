//! The workflow plan data model: `WorkflowPlan`, `PlanStep`, and the tagged
//! `PlaceholderRef` value used for inter-step parameter substitution.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which planner produced a `WorkflowPlan`, and by extension how much to
/// trust it vs. re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningMethod {
    RuleBased,
    LearningBased,
    Hybrid,
    Auto,
}

impl fmt::Display for PlanningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::RuleBased => "rule_based",
            Self::LearningBased => "learning_based",
            Self::Hybrid => "hybrid",
            Self::Auto => "auto",
        };
        write!(f, "{s}")
    }
}

/// A reference of the form `step_{i}.{field}`, resolved against the output
/// of step `i` once it has run. Kept as a distinct tagged value rather than
/// a raw string so the resolver can recognize it without re-parsing, and so
/// a literal string parameter that happens to look like `step_1.foo` is
/// never misinterpreted as a reference once the plan has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderRef {
    /// The `step_N` key this reference points at, matching the key the
    /// engine records results under (1-based, see `WorkflowResult`).
    pub step_key: String,
    /// Top-level field of the referenced step's decoded output.
    pub field: String,
}

impl PlaceholderRef {
    pub fn new(step_key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            step_key: step_key.into(),
            field: field.into(),
        }
    }

    /// The literal `step_N.field` text this reference was parsed from, used
    /// when fail-soft resolution needs to echo it back unchanged.
    pub fn as_literal(&self) -> String {
        format!("{}.{}", self.step_key, self.field)
    }

    /// Parse a `step_N.field` string, if it matches the convention.
    pub fn parse(s: &str) -> Option<Self> {
        let (step_key, field) = s.split_once('.')?;
        if !step_key.starts_with("step_") || field.is_empty() {
            return None;
        }
        let digits = &step_key["step_".len()..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(step_key, field))
    }
}

/// A single parameter value bound into a `PlanStep`: either a literal JSON
/// value or a reference into an earlier step's output.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Literal(Value),
    Placeholder(PlaceholderRef),
}

impl ParamValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    pub fn placeholder(step_key: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Placeholder(PlaceholderRef::new(step_key, field))
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        // A bare JSON string that matches the `step_N.field` convention is
        // promoted to a placeholder reference; everything else is literal.
        if let Value::String(s) = &value {
            if let Some(ph) = PlaceholderRef::parse(s) {
                return Self::Placeholder(ph);
            }
        }
        Self::Literal(value)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(v) => v.serialize(serializer),
            Self::Placeholder(ph) => serializer.serialize_str(&ph.as_literal()),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamValueVisitor;

        impl<'de> Visitor<'de> for ParamValueVisitor {
            type Value = ParamValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON value or a step_N.field placeholder string")
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let value = Value::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(ParamValue::Literal(value))
            }

            fn visit_seq<A>(self, seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let value = Value::deserialize(de::value::SeqAccessDeserializer::new(seq))?;
                Ok(ParamValue::Literal(value))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(match PlaceholderRef::parse(v) {
                    Some(ph) => ParamValue::Placeholder(ph),
                    None => ParamValue::Literal(Value::String(v.to_string())),
                })
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ParamValue::Literal(Value::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ParamValue::Literal(v.into()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(ParamValue::Literal(v.into()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ParamValue::Literal(
                    serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null),
                ))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ParamValue::Literal(Value::Null))
            }
        }

        deserializer.deserialize_any(ParamValueVisitor)
    }
}

/// A step's parameter map: literal values and/or placeholder references.
pub type ParamMap = std::collections::BTreeMap<String, ParamValue>;

/// One step of a `WorkflowPlan`: an agent, a tool on that agent, and bound
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub step_index: usize,
    pub agent: String,
    pub tool: String,
    #[serde(default)]
    pub parameters: ParamMap,
}

impl PlanStep {
    pub fn new(step_index: usize, agent: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            step_index,
            agent: agent.into(),
            tool: tool.into(),
            parameters: ParamMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}

/// The ordered workflow a planner produces from a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub workflow_id: String,
    pub planning_method: PlanningMethod,
    pub planning_reason: String,
    pub steps: Vec<PlanStep>,
}

impl WorkflowPlan {
    pub fn new(
        workflow_id: impl Into<String>,
        planning_method: PlanningMethod,
        planning_reason: impl Into<String>,
        steps: Vec<PlanStep>,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            planning_method,
            planning_reason: planning_reason.into(),
            steps,
        }
    }

    /// A plan naming no agents, per the `no_agents_workflow` boundary case.
    pub fn no_agents() -> Self {
        Self::new(
            "no_agents_workflow",
            PlanningMethod::RuleBased,
            "no agents are available to plan against",
            Vec::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_parse_recognizes_step_field_convention() {
        let ph = PlaceholderRef::parse("step_1.timestamp").unwrap();
        assert_eq!(ph.step_key, "step_1");
        assert_eq!(ph.field, "timestamp");
        assert_eq!(ph.as_literal(), "step_1.timestamp");
    }

    #[test]
    fn placeholder_parse_rejects_non_conforming_strings() {
        assert!(PlaceholderRef::parse("just a string").is_none());
        assert!(PlaceholderRef::parse("step_abc.field").is_none());
        assert!(PlaceholderRef::parse("step_1.").is_none());
    }

    #[test]
    fn param_value_deserializes_placeholder_vs_literal_string() {
        let placeholder: ParamValue = serde_json::from_str("\"step_2.portfolio_id\"").unwrap();
        assert!(matches!(placeholder, ParamValue::Placeholder(_)));

        let literal: ParamValue = serde_json::from_str("\"PORTFOLIO-002\"").unwrap();
        assert!(matches!(literal, ParamValue::Literal(_)));
    }

    #[test]
    fn param_value_round_trips_through_json() {
        let step = PlanStep::new(1, "portfolio-intelligence", "benchmark_portfolio_performance")
            .with_param("portfolio_id", ParamValue::literal(Value::String("PORTFOLIO-002".into())))
            .with_param("prior_usage", ParamValue::placeholder("step_1", "usage_kwh"));

        let json = serde_json::to_string(&step).unwrap();
        let decoded: PlanStep = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            decoded.parameters.get("prior_usage"),
            Some(ParamValue::Placeholder(ph)) if ph.as_literal() == "step_1.usage_kwh"
        ));
    }
}
