//! Application State
//!
//! Central application state for starship: a navigation stack of resource
//! view models plus the UI modes layered on top of it.

use crate::config::Config;
use crate::hyperdrive::{format_error, HyperdriveError, Representor, Transport};
use crate::viewmodel::{ResourceViewModel, ResourceViewModelResult, TransitionViewModel};
use chrono::{DateTime, Local};
use crossterm::event::KeyCode;
use std::sync::Arc;

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,   // Browsing the current resource
    Form,     // Filling in transition inputs
    Help,     // ? help popup
    Warning,  // Warning/info dialog (OK only)
    Describe, // Full value of the selected attribute
}

/// A selectable line of the resource view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Attribute(usize),
    Embedded(usize),
    Transition(usize),
}

/// One entry of the navigation stack
#[derive(Debug)]
pub struct Screen {
    pub view_model: ResourceViewModel,
    pub selected: usize,
    pub loaded_at: DateTime<Local>,
}

impl Screen {
    pub fn new(view_model: ResourceViewModel) -> Self {
        Self {
            view_model,
            selected: 0,
            loaded_at: Local::now(),
        }
    }

    /// Rows in display order: attributes, embedded resources, transitions
    pub fn rows(&self) -> Vec<Row> {
        let vm = &self.view_model;
        (0..vm.number_of_attributes())
            .map(Row::Attribute)
            .chain((0..vm.number_of_embedded_resources()).map(Row::Embedded))
            .chain((0..vm.number_of_transitions()).map(Row::Transition))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        let vm = &self.view_model;
        vm.number_of_attributes() + vm.number_of_embedded_resources() + vm.number_of_transitions()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }
}

/// Input form for a transition that needs parameters or attributes
#[derive(Debug)]
pub struct FormState {
    pub transition_index: usize,
    pub relation: String,
    pub view_model: TransitionViewModel,
    pub selected: usize,
    pub editing: bool,
    pub buffer: String,
}

/// Main application state
pub struct App {
    pub root_url: String,

    // Navigation stack; the last entry is on screen
    pub stack: Vec<Screen>,

    pub mode: Mode,
    pub form: Option<FormState>,

    // UI state
    pub loading: bool,
    pub error_message: Option<String>,
    pub warning_message: Option<String>,
    pub status_message: Option<String>,
    pub describe_data: Option<(String, String)>,

    // Persistent configuration
    pub config: Config,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, std::time::Instant)>,
}

impl App {
    /// Create App around an already loaded root resource
    pub fn from_initialized(
        client: Arc<dyn Transport>,
        root_url: String,
        root: Representor,
        config: Config,
    ) -> Self {
        let view_model = ResourceViewModel::new(client, root);
        Self {
            root_url,
            stack: vec![Screen::new(view_model)],
            mode: Mode::Normal,
            form: None,
            loading: false,
            error_message: None,
            warning_message: None,
            status_message: None,
            describe_data: None,
            config,
            last_key_press: None,
        }
    }

    /// Fetch the API root and build the App around it
    pub async fn open(
        client: Arc<dyn Transport>,
        root_url: &str,
        config: Config,
    ) -> Result<Self, HyperdriveError> {
        let root = client.request_uri(root_url).await?;
        tracing::info!("Loaded API root {}", root_url);
        Ok(Self::from_initialized(client, root_url.to_string(), root, config))
    }

    // =========================================================================
    // Stack Access
    // =========================================================================

    pub fn current(&self) -> &Screen {
        self.stack.last().expect("navigation stack is never empty")
    }

    fn current_mut(&mut self) -> &mut Screen {
        self.stack
            .last_mut()
            .expect("navigation stack is never empty")
    }

    pub fn view_model(&self) -> &ResourceViewModel {
        &self.current().view_model
    }

    pub fn selected_row(&self) -> Option<Row> {
        let screen = self.current();
        screen.rows().get(screen.selected).copied()
    }

    pub fn get_breadcrumb(&self) -> Vec<String> {
        self.stack
            .iter()
            .enumerate()
            .map(|(depth, screen)| {
                screen
                    .view_model
                    .title()
                    .map(String::from)
                    .or_else(|| screen.view_model.representor().self_uri().map(String::from))
                    .unwrap_or_else(|| if depth == 0 { "root".to_string() } else { "-".to_string() })
            })
            .collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn next(&mut self) {
        if self.mode == Mode::Form {
            if let Some(form) = self.form.as_mut() {
                let count = form.view_model.number_of_fields();
                if count > 0 && !form.editing {
                    form.selected = (form.selected + 1).min(count - 1);
                }
            }
            return;
        }
        let screen = self.current_mut();
        let count = screen.row_count();
        if count > 0 {
            screen.selected = (screen.selected + 1).min(count - 1);
        }
    }

    pub fn previous(&mut self) {
        if self.mode == Mode::Form {
            if let Some(form) = self.form.as_mut() {
                if !form.editing {
                    form.selected = form.selected.saturating_sub(1);
                }
            }
            return;
        }
        let screen = self.current_mut();
        screen.selected = screen.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.current_mut().selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        let screen = self.current_mut();
        screen.selected = screen.row_count().saturating_sub(1);
    }

    pub fn page_down(&mut self, page_size: usize) {
        let screen = self.current_mut();
        let count = screen.row_count();
        if count > 0 {
            screen.selected = (screen.selected + page_size).min(count - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        let screen = self.current_mut();
        screen.selected = screen.selected.saturating_sub(page_size);
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.form = None;
        self.warning_message = None;
        self.describe_data = None;
    }

    fn show_error(&mut self, error: &HyperdriveError) {
        tracing::error!("{}", error);
        self.error_message = Some(format_error(error));
    }

    // =========================================================================
    // Resource Navigation
    // =========================================================================

    /// Act on the selected row
    pub async fn activate(&mut self) {
        match self.selected_row() {
            Some(Row::Attribute(index)) => self.describe_attribute(index),
            Some(Row::Embedded(index)) => self.follow_embedded(index),
            Some(Row::Transition(index)) => self.follow_transition(index).await,
            None => {},
        }
    }

    fn describe_attribute(&mut self, index: usize) {
        let vm = self.view_model();
        if let (Some(key), Some(value)) = (vm.title_for_attribute(index), vm.value_for_attribute(index)) {
            self.describe_data = Some((key.to_string(), value));
            self.mode = Mode::Describe;
        }
    }

    /// Push a view model for an embedded resource. No request is made; the
    /// embedded representation is shown as-is until reloaded.
    pub fn follow_embedded(&mut self, index: usize) {
        if let Some(child) = self.view_model().view_model_for_embedded_resource(index) {
            self.push(child);
        }
    }

    /// Perform a transition directly, or open its input form
    pub async fn follow_transition(&mut self, index: usize) {
        let vm = self.view_model();
        let Some(relation) = vm.title_for_transition(index).map(String::from) else {
            return;
        };

        match vm.view_model_for_transition(index) {
            Some(form_vm) => {
                self.form = Some(FormState {
                    transition_index: index,
                    relation,
                    view_model: form_vm,
                    selected: 0,
                    editing: false,
                    buffer: String::new(),
                });
                self.mode = Mode::Form;
            },
            None => {
                self.perform_transition(index, None).await;
            },
        }
    }

    async fn perform_transition(&mut self, index: usize, form: Option<&TransitionViewModel>) {
        self.loading = true;
        self.error_message = None;

        let mut outcome = None;
        {
            let vm = &mut self.current_mut().view_model;
            match form {
                Some(form) => {
                    vm.perform_transition_with_input(index, form.input(), |r| outcome = Some(r))
                        .await
                },
                None => vm.perform_transition(index, |r| outcome = Some(r)).await,
            }
        }

        self.loading = false;

        match outcome {
            Some(ResourceViewModelResult::Success(view_model)) => self.push(view_model),
            Some(ResourceViewModelResult::Refresh) => {
                let screen = self.current_mut();
                screen.loaded_at = Local::now();
                screen.clamp_selection();
                self.status_message = Some("Resource updated".to_string());
            },
            Some(ResourceViewModelResult::Failure(e)) => self.show_error(&e),
            None => {},
        }
    }

    /// Reload the current resource from its self link
    pub async fn reload(&mut self) {
        if !self.view_model().can_reload() {
            self.show_warning("This resource has no self link and cannot be reloaded");
            return;
        }

        self.loading = true;
        self.error_message = None;

        let mut result = None;
        self.current_mut()
            .view_model
            .reload(|r| result = Some(r))
            .await;

        self.loading = false;

        match result {
            Some(Ok(_)) => {
                let screen = self.current_mut();
                screen.loaded_at = Local::now();
                screen.clamp_selection();
                self.status_message = Some("Reloaded".to_string());
            },
            Some(Err(e)) => self.show_error(&e),
            None => {},
        }
    }

    fn push(&mut self, view_model: ResourceViewModel) {
        self.stack.push(Screen::new(view_model));
        self.status_message = None;
        tracing::debug!("navigation depth {}", self.stack.len());
    }

    /// Pop the navigation stack. Returns false at the root.
    pub fn navigate_back(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            self.error_message = None;
            self.status_message = None;
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Transition Form
    // =========================================================================

    pub fn form_begin_edit(&mut self) {
        if let Some(form) = self.form.as_mut() {
            if let Some(value) = form.view_model.value_for_field(form.selected) {
                form.buffer = value.to_string();
                form.editing = true;
            }
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(form) = self.form.as_mut().filter(|f| f.editing) {
            form.buffer.push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = self.form.as_mut().filter(|f| f.editing) {
            form.buffer.pop();
        }
    }

    pub fn form_commit_edit(&mut self) {
        if let Some(form) = self.form.as_mut().filter(|f| f.editing) {
            let value = std::mem::take(&mut form.buffer);
            form.view_model.set_value_for_field(form.selected, value);
            form.editing = false;
        }
    }

    pub fn form_cancel_edit(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.buffer.clear();
            form.editing = false;
        }
    }

    /// Submit the form; required fields must be filled in first
    pub async fn submit_form(&mut self) {
        self.form_commit_edit();

        let Some(form) = self.form.take() else {
            return;
        };

        let missing = form.view_model.missing_required_fields();
        if !missing.is_empty() {
            let message = format!("Required: {}", missing.join(", "));
            // Form stays open underneath the warning
            self.form = Some(form);
            self.show_warning(&message);
            return;
        }

        self.mode = Mode::Normal;
        self.perform_transition(form.transition_index, Some(&form.view_model))
            .await;
    }

    /// Close a warning, returning to the form if one is pending
    pub fn dismiss_warning(&mut self) {
        self.warning_message = None;
        self.mode = if self.form.is_some() {
            Mode::Form
        } else {
            Mode::Normal
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperdrive::client::mock::MockTransport;
    use crate::hyperdrive::{InputProperty, Transition};

    fn create_root() -> Representor {
        Representor::new()
            .with_attribute("title", "Polls API")
            .with_representor("polls", Representor::new().with_attribute("question", "Q1"))
            .with_transition("self", Transition::new("https://api.example.com/"))
            .with_transition("polls", Transition::new("https://api.example.com/polls"))
            .with_transition(
                "create",
                Transition::new("https://api.example.com/polls")
                    .with_method("POST")
                    .with_attribute(
                        "question",
                        InputProperty {
                            required: true,
                            ..Default::default()
                        },
                    ),
            )
    }

    fn create_app() -> (Arc<MockTransport>, App) {
        let mock = Arc::new(MockTransport::new());
        let app = App::from_initialized(
            mock.clone(),
            "https://api.example.com/".to_string(),
            create_root(),
            Config::default(),
        );
        (mock, app)
    }

    #[test]
    fn test_client_is_held_by_view_models_only() {
        let (mock, mut app) = create_app();
        assert_eq!(Arc::strong_count(&mock), 2);

        app.follow_embedded(0);
        assert_eq!(Arc::strong_count(&mock), 3);
        app.navigate_back();
        assert_eq!(Arc::strong_count(&mock), 2);
    }

    #[test]
    fn test_rows_in_section_order() {
        let (_, app) = create_app();
        assert_eq!(
            app.current().rows(),
            vec![
                Row::Attribute(0),
                Row::Embedded(0),
                Row::Transition(0),
                Row::Transition(1),
            ]
        );
    }

    #[test]
    fn test_selection_bounds() {
        let (_, mut app) = create_app();
        app.previous();
        assert_eq!(app.current().selected, 0);
        app.page_down(10);
        assert_eq!(app.current().selected, 3);
        app.next();
        assert_eq!(app.current().selected, 3);
        app.go_to_top();
        assert_eq!(app.selected_row(), Some(Row::Attribute(0)));
    }

    #[test]
    fn test_follow_embedded_pushes_and_back_pops() {
        let (mock, mut app) = create_app();
        app.current_mut().selected = 1;
        tokio_test::block_on(app.activate());

        assert_eq!(app.stack.len(), 2);
        assert_eq!(app.view_model().title(), Some("Q1"));
        assert!(mock.requests().is_empty());
        assert_eq!(app.get_breadcrumb(), vec!["Polls API", "Q1"]);

        assert!(app.navigate_back());
        assert!(!app.navigate_back());
        assert_eq!(app.stack.len(), 1);
    }

    #[test]
    fn test_transition_without_input_navigates() {
        let (mock, mut app) = create_app();
        // Transitions by name: create, polls
        mock.respond_with(Ok(Representor::new()
            .with_attribute("title", "All polls")
            .with_transition("self", Transition::new("https://api.example.com/polls"))));

        tokio_test::block_on(app.follow_transition(1));

        assert_eq!(app.stack.len(), 2);
        assert_eq!(app.view_model().title(), Some("All polls"));
        assert!(!app.loading);
    }

    #[test]
    fn test_transition_failure_sets_error() {
        let (mock, mut app) = create_app();
        mock.respond_with(Err(HyperdriveError::Http { status: 404 }));

        tokio_test::block_on(app.follow_transition(1));

        assert_eq!(app.stack.len(), 1);
        assert_eq!(app.error_message.as_deref(), Some("Resource not found."));
    }

    #[test]
    fn test_form_requires_fields_then_submits() {
        let (mock, mut app) = create_app();
        tokio_test::block_on(app.follow_transition(0));
        assert_eq!(app.mode, Mode::Form);
        assert_eq!(app.form.as_ref().unwrap().relation, "create");

        tokio_test::block_on(app.submit_form());
        assert_eq!(app.mode, Mode::Warning);
        assert!(app.form.is_some());
        app.dismiss_warning();
        assert_eq!(app.mode, Mode::Form);

        app.form_begin_edit();
        for c in "Tabs?".chars() {
            app.form_input_char(c);
        }
        app.form_commit_edit();

        mock.respond_with(Ok(Representor::new()
            .with_attribute("question", "Tabs?")
            .with_transition("self", Transition::new("https://api.example.com/polls/9"))));
        tokio_test::block_on(app.submit_form());

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.form.is_none());
        assert_eq!(app.stack.len(), 2);
        assert_eq!(
            mock.inputs()[0].attributes["question"],
            serde_json::json!("Tabs?")
        );
    }

    #[test]
    fn test_reload_refreshes_in_place() {
        let (mock, mut app) = create_app();
        app.go_to_bottom();
        mock.respond_with(Ok(Representor::new()
            .with_attribute("title", "Polls API v2")
            .with_transition("self", Transition::new("https://api.example.com/"))));

        tokio_test::block_on(app.reload());

        assert_eq!(app.stack.len(), 1);
        assert_eq!(app.view_model().title(), Some("Polls API v2"));
        assert_eq!(app.current().selected, 0);
        assert_eq!(app.status_message.as_deref(), Some("Reloaded"));
    }

    #[test]
    fn test_reload_without_self_warns() {
        let mock = Arc::new(MockTransport::new());
        let mut app = App::from_initialized(
            mock.clone(),
            "https://api.example.com/".to_string(),
            Representor::new().with_attribute("a", 1),
            Config::default(),
        );

        tokio_test::block_on(app.reload());

        assert_eq!(app.mode, Mode::Warning);
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn test_describe_attribute() {
        let (_, mut app) = create_app();
        tokio_test::block_on(app.activate());
        assert_eq!(app.mode, Mode::Describe);
        assert_eq!(
            app.describe_data,
            Some(("title".to_string(), "Polls API".to_string()))
        );
        app.exit_mode();
        assert!(app.describe_data.is_none());
    }
}
