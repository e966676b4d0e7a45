use ratatui::Frame;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};
use revasm::engine::Register;

use super::App;
use super::formatting::format_value;

pub(super) fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let rows = Register::ALL.iter().map(|&reg| register_row(reg, app));
    let table = Table::new(rows, [Constraint::Length(6), Constraint::Min(20)]).block(register_block());
    f.render_widget(table, area);
}

fn register_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded)
        .title("Registers")
}

fn register_row(reg: Register, app: &App) -> Row<'static> {
    let value = app.snapshot.reg(reg);
    let style = if app.snapshot.modified.contains(&reg) {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(format!("%{}", reg.name())).style(style),
        Cell::from(format_value(value, app.fmt_mode)).style(style),
    ])
}
