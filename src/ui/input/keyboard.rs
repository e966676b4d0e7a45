use crate::ui::app::{App, FormatMode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{io, time::Instant};

/// Returns `Ok(true)` when the app should exit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> io::Result<bool> {
    if key.kind != KeyEventKind::Press {
        return Ok(false);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+R: reload the file and restart
    if ctrl && matches!(key.code, KeyCode::Char('r')) {
        app.restart();
        return Ok(false);
    }
    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('s') | KeyCode::Char('n') | KeyCode::Right => {
            app.is_running = false;
            app.step_forward();
        }
        KeyCode::Char('b') | KeyCode::Left => app.step_back(),
        KeyCode::Char('r') => {
            if app.load_ok && !app.snapshot.is_finished() {
                app.is_running = true;
                app.last_step_time = Instant::now();
            }
        }
        KeyCode::Char('p') => app.is_running = false,
        KeyCode::Char('h') => {
            app.fmt_mode = match app.fmt_mode {
                FormatMode::Hex => FormatMode::Dec,
                FormatMode::Dec => FormatMode::Hex,
            };
        }
        KeyCode::Char('c') => app.console.clear(),
        KeyCode::Up => app.console.scroll = app.console.scroll.saturating_add(1),
        KeyCode::Down => app.console.scroll = app.console.scroll.saturating_sub(1),
        _ => {}
    }
    Ok(false)
}
