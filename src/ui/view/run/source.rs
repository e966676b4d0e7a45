use ratatui::Frame;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem};

use super::App;

pub(super) fn render_source(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded)
        .title("Source - ▶ next  · last");
    let inner = block.inner(area);
    let items = source_items(inner, app);

    f.render_widget(block, area);
    f.render_widget(List::new(items), inner);
}

// Keeps the next line roughly centered.
fn first_visible(inner: Rect, app: &App) -> usize {
    let focus = app
        .snapshot
        .next_line
        .unwrap_or(app.snapshot.current_line)
        .saturating_sub(1);
    let rows = inner.height as usize;
    let max_start = app.source.len().saturating_sub(rows);
    focus.saturating_sub(rows / 2).min(max_start)
}

fn source_items(inner: Rect, app: &App) -> Vec<ListItem<'static>> {
    let start = first_visible(inner, app);
    app.source
        .iter()
        .enumerate()
        .skip(start)
        .take(inner.height as usize)
        .map(|(i, text)| source_item(app, i + 1, text))
        .collect()
}

fn source_item(app: &App, line: usize, text: &str) -> ListItem<'static> {
    let is_next = app.snapshot.next_line == Some(line);
    let is_last = app.snapshot.current_line == line;
    let marker = match (is_next, is_last) {
        (true, _) => "▶",
        (false, true) => "·",
        _ => " ",
    };
    let item = ListItem::new(format!("{marker}{line:>4}  {text}"));

    if is_next {
        item.style(Style::default().bg(Color::Yellow).fg(Color::Black))
    } else if is_last {
        item.style(Style::default().fg(Color::Green))
    } else {
        item
    }
}
