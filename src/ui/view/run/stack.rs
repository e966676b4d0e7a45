use ratatui::Frame;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};
use revasm::engine::StackEntry;
use revasm::engine::memory::is_gap;

use super::App;
use super::formatting::{format_address, format_value};

pub(super) fn render_stack(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["rbp+", "address", "value", ""])
        .style(Style::default().fg(Color::DarkGray));
    let stack = &app.snapshot.stack;
    let mut rows = Vec::with_capacity(stack.len() + 1);
    for (i, e) in stack.iter().enumerate() {
        if i > 0 && is_gap(&stack[i - 1], e) {
            rows.push(gap_row());
        }
        rows.push(stack_row(e, app));
    }
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .border_type(BorderType::Rounded)
            .title("Stack"),
    );
    f.render_widget(table, area);
}

fn stack_row(e: &StackEntry, app: &App) -> Row<'static> {
    let tag = match (e.is_rbp, e.is_rsp) {
        (true, true) => "◀ rbp,rsp",
        (true, false) => "◀ rbp",
        (false, true) => "◀ rsp",
        (false, false) => "",
    };
    let value = if e.has_value {
        format_value(e.value, app.fmt_mode)
    } else {
        "-".to_string()
    };

    let mut style = Style::default();
    if !e.has_value {
        style = style.fg(Color::DarkGray);
    }
    if e.is_rsp {
        style = style.fg(Color::Yellow);
    } else if e.is_rbp {
        style = style.fg(Color::LightBlue);
    }

    Row::new(vec![
        Cell::from(format!("{:+}", e.offset)),
        Cell::from(format_address(e.address)),
        Cell::from(value),
        Cell::from(tag),
    ])
    .style(style)
}

fn gap_row() -> Row<'static> {
    Row::new(vec!["", "⋮", "", ""]).style(Style::default().fg(Color::DarkGray))
}
