use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use crate::ui::app::App;

pub(crate) fn render_build_status(f: &mut Frame, area: Rect, app: &App) {
    let style = if app.load_ok {
        Style::default().bg(Color::Green).fg(Color::Black)
    } else {
        Style::default().bg(Color::Red).fg(Color::Black)
    };
    let status = Paragraph::new(app.load_msg.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Load")
            .border_style(Style::default().fg(Color::DarkGray))
            .border_type(BorderType::Rounded),
    );
    f.render_widget(status, area);
}
