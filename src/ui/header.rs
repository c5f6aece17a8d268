//! Header Component
//!
//! Displays the current resource, its self link and context information.

use crate::app::App;
use crate::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" starship v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let screen = app.current();
    let vm = &screen.view_model;

    // Row 1: API root and depth
    let root_line = Line::from(vec![
        Span::styled(" API: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            &app.root_url,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Depth: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}", app.stack.len()),
            Style::default().fg(Color::White),
        ),
    ]);
    f.render_widget(Paragraph::new(root_line), rows[0]);

    // Row 2: self link and load time
    let self_line = Line::from(vec![
        Span::styled(" Self: ", Style::default().fg(Color::DarkGray)),
        match vm.representor().self_uri() {
            Some(uri) => Span::styled(uri.to_string(), Style::default().fg(Color::Green)),
            None => Span::styled("(none)", Style::default().fg(Color::DarkGray)),
        },
        Span::raw("  "),
        Span::styled("Loaded: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            screen.loaded_at.format("%H:%M:%S").to_string(),
            Style::default().fg(Color::White),
        ),
        if app.loading {
            Span::styled(
                "  [loading...]",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else if let Some(status) = &app.status_message {
            Span::styled(format!("  {}", status), Style::default().fg(Color::Green))
        } else {
            Span::raw("")
        },
    ]);
    f.render_widget(Paragraph::new(self_line), rows[1]);

    // Row 3: Help hint; reload only offered when the resource supports it
    let mut hints = String::from(" ?:help  enter:open  b:back");
    if vm.can_reload() {
        hints.push_str("  r:reload");
    }
    hints.push_str("  q:quit");
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[2],
    );
}
