//! Representor
//!
//! The decoded form of a hypermedia document: attributes, embedded
//! resources and the transitions available from the resource.

use serde_json::Value;
use std::collections::BTreeMap;

/// Relation reserved for a resource's own canonical link
pub const SELF_RELATION: &str = "self";

/// A single input a transition accepts (query/path parameter or body attribute)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputProperty {
    pub title: Option<String>,
    /// Current value suggested by the server
    pub value: Option<Value>,
    pub default_value: Option<Value>,
    pub required: bool,
}

impl InputProperty {
    /// Value to use when the user supplies none
    pub fn effective_value(&self) -> Option<&Value> {
        self.value.as_ref().or(self.default_value.as_ref())
    }
}

/// An action the resource advertises: a link or a form
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub uri: String,
    pub method: String,
    pub suggested_content_types: Vec<String>,
    pub attributes: BTreeMap<String, InputProperty>,
    pub parameters: BTreeMap<String, InputProperty>,
}

impl Transition {
    /// Create a plain GET transition with no inputs
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            method: "GET".to_string(),
            suggested_content_types: Vec::new(),
            attributes: BTreeMap::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    pub fn with_parameter(mut self, name: &str, property: InputProperty) -> Self {
        self.parameters.insert(name.to_string(), property);
        self
    }

    pub fn with_attribute(mut self, name: &str, property: InputProperty) -> Self {
        self.attributes.insert(name.to_string(), property);
        self
    }

    /// True if the user has to fill something in before this transition runs
    pub fn requires_input(&self) -> bool {
        self.parameters.len() + self.attributes.len() > 0
    }
}

/// User supplied values for one transition execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionInput {
    pub attributes: BTreeMap<String, Value>,
    pub parameters: BTreeMap<String, String>,
}

/// A hypermedia resource representation.
///
/// All three facets are `BTreeMap`s so iteration order is by key, whatever
/// order the document listed them in. View models rely on this for stable
/// index addressing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Representor {
    pub attributes: BTreeMap<String, Value>,
    pub representors: BTreeMap<String, Vec<Representor>>,
    pub transitions: BTreeMap<String, Transition>,
}

impl Representor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_representor(mut self, relation: &str, representor: Representor) -> Self {
        self.representors
            .entry(relation.to_string())
            .or_default()
            .push(representor);
        self
    }

    pub fn with_transition(mut self, relation: &str, transition: Transition) -> Self {
        self.transitions.insert(relation.to_string(), transition);
        self
    }

    /// The canonical reload link, if the resource has one
    pub fn self_transition(&self) -> Option<&Transition> {
        self.transitions.get(SELF_RELATION)
    }

    pub fn self_uri(&self) -> Option<&str> {
        self.self_transition().map(|t| t.uri.as_str())
    }
}

/// Render an attribute value as display text.
///
/// Strings are shown without quotes; arrays and objects as compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
