//! Transition View Model
//!
//! Presents the inputs a transition needs as an editable field list, then
//! executes the transition with what the user entered.

use super::resource::ResourceViewModel;
use crate::hyperdrive::{
    display_value, HyperdriveError, InputProperty, Transition, TransitionInput, Transport,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Where a field's value ends up in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// URI template variable or query parameter
    Parameter,
    /// Request body attribute
    Attribute,
}

/// One editable input
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionField {
    pub kind: FieldKind,
    pub name: String,
    pub title: String,
    pub required: bool,
    pub value: String,
    /// Seeded from a non-string JSON value; edited text is re-read as JSON
    structured: bool,
}

impl TransitionField {
    fn new(kind: FieldKind, name: &str, property: &InputProperty) -> Self {
        let seed = property.effective_value();
        Self {
            kind,
            name: name.to_string(),
            title: property.title.clone().unwrap_or_else(|| name.to_string()),
            required: property.required,
            value: seed.map(display_value).unwrap_or_default(),
            structured: seed.is_some_and(|v| !v.is_string()),
        }
    }

    fn attribute_value(&self) -> Value {
        if self.structured {
            if let Ok(value) = serde_json::from_str(&self.value) {
                return value;
            }
        }
        Value::String(self.value.clone())
    }
}

/// Form-style view over a transition's parameters and attributes
pub struct TransitionViewModel {
    client: Arc<dyn Transport>,
    transition: Transition,
    fields: Vec<TransitionField>,
}

impl fmt::Debug for TransitionViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionViewModel")
            .field("transition", &self.transition)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl TransitionViewModel {
    /// Fields are ordered parameters first, then attributes, each by name
    pub fn new(client: Arc<dyn Transport>, transition: Transition) -> Self {
        let parameters = transition
            .parameters
            .iter()
            .map(|(name, p)| TransitionField::new(FieldKind::Parameter, name, p));
        let attributes = transition
            .attributes
            .iter()
            .map(|(name, p)| TransitionField::new(FieldKind::Attribute, name, p));
        let fields = parameters.chain(attributes).collect();

        Self {
            client,
            transition,
            fields,
        }
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn method(&self) -> &str {
        &self.transition.method
    }

    pub fn uri(&self) -> &str {
        &self.transition.uri
    }

    pub fn number_of_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&TransitionField> {
        self.fields.get(index)
    }

    pub fn title_for_field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.title.as_str())
    }

    pub fn value_for_field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.value.as_str())
    }

    /// Replace a field's text. Returns false for an unknown index.
    pub fn set_value_for_field(&mut self, index: usize, value: String) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    /// Names of required fields that are still empty
    pub fn missing_required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.required && f.value.is_empty())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Collect the entered values. Empty fields are left out.
    pub fn input(&self) -> TransitionInput {
        let mut input = TransitionInput::default();
        for field in self.fields.iter().filter(|f| !f.value.is_empty()) {
            match field.kind {
                FieldKind::Parameter => {
                    input
                        .parameters
                        .insert(field.name.clone(), field.value.clone());
                }
                FieldKind::Attribute => {
                    input
                        .attributes
                        .insert(field.name.clone(), field.attribute_value());
                }
            }
        }
        input
    }

    /// Execute the transition and wrap the result in a new view model.
    ///
    /// This never refreshes a resource in place, even when the result has the
    /// same `self` link. Use `ResourceViewModel::perform_transition_with_input`
    /// with [`input`](Self::input) for Refresh/Success routing.
    pub async fn perform(&self) -> Result<ResourceViewModel, HyperdriveError> {
        let representor = self.client.request(&self.transition, &self.input()).await?;
        Ok(ResourceViewModel::new(self.client.clone(), representor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperdrive::client::mock::MockTransport;
    use crate::hyperdrive::Representor;
    use serde_json::json;

    fn create_transition() -> Transition {
        Transition::new("https://api.example.com/polls")
            .with_method("POST")
            .with_parameter("draft", InputProperty::default())
            .with_attribute(
                "question",
                InputProperty {
                    title: Some("Question".to_string()),
                    required: true,
                    ..Default::default()
                },
            )
            .with_attribute(
                "choices",
                InputProperty {
                    default_value: Some(json!(["Yes", "No"])),
                    ..Default::default()
                },
            )
    }

    fn create_view_model() -> (Arc<MockTransport>, TransitionViewModel) {
        let mock = Arc::new(MockTransport::new());
        let vm = TransitionViewModel::new(mock.clone(), create_transition());
        (mock, vm)
    }

    #[test]
    fn test_fields_parameters_first_then_attributes() {
        let (_, vm) = create_view_model();
        assert_eq!(vm.number_of_fields(), 3);
        assert_eq!(vm.field(0).unwrap().kind, FieldKind::Parameter);
        assert_eq!(vm.title_for_field(0), Some("draft"));
        assert_eq!(vm.title_for_field(1), Some("choices"));
        assert_eq!(vm.title_for_field(2), Some("Question"));
        assert_eq!(vm.value_for_field(1), Some(r#"["Yes","No"]"#));
        assert_eq!(vm.title_for_field(3), None);
    }

    #[test]
    fn test_missing_required_fields() {
        let (_, mut vm) = create_view_model();
        assert_eq!(vm.missing_required_fields(), vec!["question"]);

        assert!(vm.set_value_for_field(2, "Tabs?".to_string()));
        assert!(vm.missing_required_fields().is_empty());
        assert!(!vm.set_value_for_field(9, "x".to_string()));
    }

    #[test]
    fn test_input_reparses_structured_values() {
        let (_, mut vm) = create_view_model();
        vm.set_value_for_field(1, r#"["A","B","C"]"#.to_string());
        vm.set_value_for_field(2, "Tabs?".to_string());

        let input = vm.input();
        assert!(input.parameters.is_empty());
        assert_eq!(input.attributes["choices"], json!(["A", "B", "C"]));
        assert_eq!(input.attributes["question"], json!("Tabs?"));
    }

    #[test]
    fn test_input_keeps_unparseable_text_as_string() {
        let (_, mut vm) = create_view_model();
        vm.set_value_for_field(1, "not json".to_string());
        assert_eq!(vm.input().attributes["choices"], json!("not json"));
    }

    #[test]
    fn test_perform_returns_new_view_model() {
        let (mock, mut vm) = create_view_model();
        vm.set_value_for_field(0, "true".to_string());
        mock.respond_with(Ok(Representor::new().with_attribute("question", "Tabs?")));

        let result = tokio_test::block_on(vm.perform()).unwrap();

        assert_eq!(result.title(), Some("Tabs?"));
        assert_eq!(mock.requests(), vec!["https://api.example.com/polls"]);
        assert_eq!(mock.inputs()[0].parameters["draft"], "true");
    }

    #[test]
    fn test_perform_forwards_error() {
        let (mock, vm) = create_view_model();
        mock.respond_with(Err(HyperdriveError::Http { status: 422 }));

        let err = tokio_test::block_on(vm.perform()).unwrap_err();
        assert_eq!(err, HyperdriveError::Http { status: 422 });
    }
}
