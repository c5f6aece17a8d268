//! Help Overlay
//!
//! Shows keyboard shortcuts.

use super::centered_rect;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(description),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

pub fn render(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("Navigation"),
        key_line("j/k, ↑/↓", "Move up/down"),
        key_line("gg / G", "Go to top / bottom"),
        key_line("Ctrl+d/u", "Page down/up"),
        key_line("Enter, l", "Open embedded resource, follow transition, show value"),
        key_line("b, h, Bksp", "Go back"),
        Line::from(""),
        section("Resource"),
    ];

    if app.view_model().can_reload() {
        help_text.push(key_line("r", "Reload from self link"));
    } else {
        help_text.push(Line::from(Span::styled(
            "  (no self link: reload unavailable)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    help_text.extend([
        Line::from(""),
        section("Transition form"),
        key_line("Enter", "Edit field / finish editing"),
        key_line("Ctrl+s", "Submit"),
        key_line("Esc", "Cancel edit / close form"),
        Line::from(""),
        key_line("?/Esc", "Close help"),
        key_line("q", "Quit application"),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Help ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    f.render_widget(paragraph, popup_area);
}
