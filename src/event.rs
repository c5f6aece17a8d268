//! Event Handling
//!
//! Keyboard and event handling for starship.

use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use std::time::Duration;

/// Handle events, returns true if app should quit
pub async fn handle_events(app: &mut App) -> Result<bool> {
    if poll(Duration::from_millis(100))? {
        if let Event::Key(key) = read()? {
            return handle_key_event(app, key.code, key.modifiers).await;
        }
    }
    Ok(false)
}

pub async fn handle_key_event(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    // Global quit shortcut
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers).await,
        Mode::Form => handle_form_mode(app, code, modifiers).await,
        Mode::Help => handle_help_mode(app, code),
        Mode::Warning => handle_warning_mode(app, code),
        Mode::Describe => handle_describe_mode(app, code),
    }
}

async fn handle_normal_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    // Double-g goes to top
    if code == KeyCode::Char('g') {
        if let Some((KeyCode::Char('g'), time)) = app.last_key_press {
            if time.elapsed() < Duration::from_millis(1000) {
                app.go_to_top();
                app.last_key_press = None;
                return Ok(false);
            }
        }
        app.last_key_press = Some((code, std::time::Instant::now()));
        return Ok(false);
    }

    app.last_key_press = None;

    match code {
        KeyCode::Char('q') => return Ok(true),

        // Navigation - vim style + accessible alternatives
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Home => app.go_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.go_to_bottom(),
        KeyCode::PageDown => app.page_down(10),
        KeyCode::PageUp => app.page_up(10),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down(10);
        },
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up(10);
        },

        // Follow embedded resource / transition, or show attribute
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.activate().await;
        },

        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.reload().await;
        },

        // Back navigation
        KeyCode::Backspace | KeyCode::Left | KeyCode::Char('b') | KeyCode::Char('h') => {
            app.navigate_back();
        },

        KeyCode::Char('?') => {
            app.enter_help_mode();
        },

        KeyCode::Esc => {
            app.error_message = None;
            app.status_message = None;
        },

        _ => {},
    }

    Ok(false)
}

async fn handle_form_mode(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
    let editing = app.form.as_ref().is_some_and(|f| f.editing);

    if code == KeyCode::Char('s') && modifiers.contains(KeyModifiers::CONTROL) {
        app.submit_form().await;
        return Ok(false);
    }

    if editing {
        match code {
            KeyCode::Enter | KeyCode::Tab => app.form_commit_edit(),
            KeyCode::Esc => app.form_cancel_edit(),
            KeyCode::Backspace => app.form_backspace(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.form_input_char(c);
            },
            _ => {},
        }
        return Ok(false);
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.exit_mode(),
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.previous(),
        KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('i') => app.form_begin_edit(),
        _ => {},
    }
    Ok(false)
}

fn handle_help_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Enter => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_warning_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.dismiss_warning();
        },
        _ => {},
    }
    Ok(false)
}

fn handle_describe_mode(app: &mut App, code: KeyCode) -> Result<bool> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Backspace => {
            app.exit_mode();
        },
        _ => {},
    }
    Ok(false)
}
