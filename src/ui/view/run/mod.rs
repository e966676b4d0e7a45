use ratatui::Frame;
use ratatui::prelude::*;

use super::components::{render_build_status, render_console};
pub(super) use super::{App, FormatMode};

mod formatting;
mod sidebar;
mod source;
mod stack;
mod status;

use sidebar::render_sidebar;
use source::render_source;
use stack::render_stack;
use status::render_run_status;

pub(super) fn render_run(f: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(6),
        ])
        .split(area);

    render_build_status(f, layout[0], app);
    render_run_status(f, layout[1], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(30),
            Constraint::Min(30),
            Constraint::Length(50),
        ])
        .split(layout[2]);

    render_sidebar(f, columns[0], app);
    render_source(f, columns[1], app);
    render_stack(f, columns[2], app);

    render_console(f, layout[3], app);
}
