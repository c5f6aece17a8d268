//! Terminal User Interface rendering module
//!
//! Renders the resource on top of the navigation stack as one grouped list
//! (attributes, embedded resources, transitions) using ratatui.
//!
//! # Architecture
//!
//! - `header` - Header bar with title, self link and load time
//! - `form` - Transition input form overlay
//! - `dialog` - Warning and attribute value dialogs
//! - `help` - Help overlay showing keybindings

mod dialog;
mod form;
mod header;
mod help;

use crate::app::{App, Mode, Row as AppRow};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Header
            Constraint::Min(1),    // Resource list
            Constraint::Length(1), // Footer/crumb
        ])
        .split(f.area());

    header::render(f, app, chunks[0]);
    render_resource(f, app, chunks[1]);
    render_crumb(f, app, chunks[2]);

    // Overlays
    match app.mode {
        Mode::Form => form::render(f, app),
        Mode::Help => help::render(f, app),
        Mode::Warning | Mode::Describe => {
            // A warning raised from the form is drawn over it
            if app.form.is_some() {
                form::render(f, app);
            }
            dialog::render(f, app);
        },
        Mode::Normal => {},
    }
}

fn section_header(label: &str, count: usize) -> Row<'static> {
    Row::new(vec![Cell::from(Span::styled(
        format!("{} ({})", label, count),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))])
}

/// Build table rows and the display index of the selected entry
fn build_rows(app: &App) -> (Vec<Row<'static>>, Option<usize>) {
    let screen = app.current();
    let vm = &screen.view_model;
    let mut rows = Vec::new();
    let mut selected_display = None;

    let key_style = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::DarkGray);

    for (position, row) in screen.rows().into_iter().enumerate() {
        // Section header before the first entry of each group
        match row {
            AppRow::Attribute(0) => rows.push(section_header("Attributes", vm.number_of_attributes())),
            AppRow::Embedded(0) => rows.push(section_header(
                "Embedded",
                vm.number_of_embedded_resources(),
            )),
            AppRow::Transition(0) => {
                rows.push(section_header("Transitions", vm.number_of_transitions()))
            },
            _ => {},
        }

        if position == screen.selected {
            selected_display = Some(rows.len());
        }

        let cells = match row {
            AppRow::Attribute(i) => vec![
                Cell::from(Span::styled(
                    format!("  {}", vm.title_for_attribute(i).unwrap_or("-")),
                    key_style,
                )),
                Cell::from(vm.value_for_attribute(i).unwrap_or_default()),
            ],
            AppRow::Embedded(i) => vec![
                Cell::from(Span::styled(
                    format!("  {}", vm.relation_for_embedded_resource(i).unwrap_or("-")),
                    key_style,
                )),
                Cell::from(match vm.title_for_embedded_resource(i) {
                    Some(title) => Span::raw(title.to_string()),
                    None => Span::styled("(untitled)", dim),
                }),
            ],
            AppRow::Transition(i) => {
                let relation = vm.title_for_transition(i).unwrap_or("-");
                let detail = match vm.transition_for_index(i) {
                    Some(t) if t.requires_input() => Line::from(vec![
                        Span::styled(format!("{} ", t.method), Style::default().fg(Color::Magenta)),
                        Span::raw(t.uri.clone()),
                        Span::styled(" [form]", dim),
                    ]),
                    Some(t) => Line::from(vec![
                        Span::styled(format!("{} ", t.method), Style::default().fg(Color::Green)),
                        Span::raw(t.uri.clone()),
                    ]),
                    None => Line::from(""),
                };
                vec![
                    Cell::from(Span::styled(format!("  {}", relation), key_style)),
                    Cell::from(detail),
                ]
            },
        };
        rows.push(Row::new(cells));
    }

    (rows, selected_display)
}

fn render_resource(f: &mut Frame, app: &App, area: Rect) {
    let vm = app.view_model();
    let title = match vm.title() {
        Some(t) => format!(" {} ", t),
        None => " Resource ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

    if app.current().row_count() == 0 {
        let empty = Paragraph::new(Line::from(Span::styled(
            " Empty resource",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let (rows, selected) = build_rows(app);

    let table = Table::new(rows, [Constraint::Percentage(30), Constraint::Percentage(70)])
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(selected);
    f.render_stateful_widget(table, area, &mut state);
}

fn render_crumb(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(err) = &app.error_message {
        Line::from(Span::styled(
            format!(" Error: {}", err),
            Style::default().fg(Color::Red),
        ))
    } else {
        let path = app.get_breadcrumb().join(" > ");
        Line::from(vec![
            Span::styled(" ", Style::default()),
            Span::styled(path, Style::default().fg(Color::DarkGray)),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Centered popup area as percentages of `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hyperdrive::client::mock::MockTransport;
    use crate::hyperdrive::{Representor, Transition};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn create_app() -> App {
        let root = Representor::new()
            .with_attribute("title", "Polls API")
            .with_representor("polls", Representor::new().with_attribute("question", "Q1"))
            .with_transition("next", Transition::new("https://api.example.com/2"));
        App::from_initialized(
            Arc::new(MockTransport::new()),
            "https://api.example.com/".to_string(),
            root,
            Config::default(),
        )
    }

    #[test]
    fn test_build_rows_inserts_section_headers() {
        let mut app = create_app();
        let (rows, selected) = build_rows(&app);
        // 3 headers + 3 entries
        assert_eq!(rows.len(), 6);
        assert_eq!(selected, Some(1));

        app.go_to_bottom();
        let (_, selected) = build_rows(&app);
        assert_eq!(selected, Some(5));
    }

    #[test]
    fn test_render_shows_sections() {
        let app = create_app();
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Attributes (1)"));
        assert!(text.contains("Embedded (1)"));
        assert!(text.contains("Transitions (1)"));
        assert!(text.contains("Polls API"));
    }
}
