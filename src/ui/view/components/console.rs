use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::app::App;

pub(crate) fn render_console(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title("Console - Up/Down scroll")
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    let h = inner.height as usize;
    let total = app.console.lines.len();
    let max_scroll = total.saturating_sub(h);
    let scroll = app.console.scroll.min(max_scroll);
    let start = total.saturating_sub(h + scroll);
    let end = total.saturating_sub(scroll);
    let lines: Vec<Line> = app.console.lines[start..end]
        .iter()
        .map(|l| {
            if l.is_error {
                Line::styled(l.text.as_str(), Style::default().fg(Color::Red))
            } else {
                Line::from(l.text.as_str())
            }
        })
        .collect();
    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}
