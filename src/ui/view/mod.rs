use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub(super) use super::app::{App, FormatMode};

mod components;
mod run;

use run::render_run;

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " revasm ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.path.display().to_string()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_run(f, chunks[1], app);

    let status = Paragraph::new(
        "s/→=step  b/←=back  r=run  p=pause  h=hex/dec  c=clear  Ctrl+R=reload  q=quit",
    )
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[2]);
}
