//! Transition Form
//!
//! Overlay for entering the parameters and attributes of a transition.

use super::centered_rect;
use crate::app::App;
use crate::viewmodel::FieldKind;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let Some(form) = &app.form else {
        return;
    };
    let vm = &form.view_model;

    let popup_area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" {} ", form.relation),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let target = Line::from(vec![
        Span::styled(
            format!(" {} ", vm.method()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(vm.uri().to_string()),
    ]);
    f.render_widget(Paragraph::new(target), chunks[0]);

    let mut lines = Vec::with_capacity(vm.number_of_fields());
    for index in 0..vm.number_of_fields() {
        let Some(field) = vm.field(index) else {
            continue;
        };
        let is_selected = index == form.selected;

        let marker = match field.kind {
            FieldKind::Parameter => "?",
            FieldKind::Attribute => "=",
        };
        let label = format!(
            " {} {}{}: ",
            marker,
            field.title,
            if field.required { "*" } else { "" }
        );

        let value = if is_selected && form.editing {
            Span::styled(
                format!("{}_", form.buffer),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else if field.value.is_empty() {
            Span::styled("(empty)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(field.value.clone())
        };

        let label_style = if is_selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        lines.push(Line::from(vec![Span::styled(label, label_style), value]));
    }
    f.render_widget(Paragraph::new(lines), chunks[1]);

    let hint = if form.editing {
        " enter:done  esc:cancel edit  ctrl+s:submit"
    } else {
        " j/k:move  enter:edit  ctrl+s:submit  esc:close"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        ))),
        chunks[2],
    );
}
