use ratatui::Frame;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use revasm::engine::{FinishReason, Phase};

use super::{App, FormatMode};

pub(super) fn render_run_status(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .border_type(BorderType::Rounded)
        .title("Run Controls");

    let para = Paragraph::new(status_lines(app)).block(block);
    f.render_widget(para, area);
}

fn status_lines(app: &App) -> Vec<Line<'static>> {
    vec![Line::from(status_spans(app)), counters_line(app)]
}

fn status_spans(app: &App) -> Vec<Span<'static>> {
    vec![
        Span::raw("State "),
        button_span(phase_text(app), phase_color(app)),
        Span::raw("  Run "),
        button_span(run_text(app), run_color(app)),
        Span::raw("  Format "),
        button_span(format_text(app), format_color(app)),
    ]
}

fn counters_line(app: &App) -> Line<'static> {
    let s = &app.snapshot;
    let mut text = format!(
        "step {}  line {}  undo depth {}",
        s.step_count, s.current_line, s.history_depth
    );
    if s.history_evicted > 0 {
        text.push_str(&format!(" ({} oldest dropped)", s.history_evicted));
    }
    Line::from(text)
}

fn phase_text(app: &App) -> &'static str {
    match app.snapshot.phase {
        Phase::Ready => "READY",
        Phase::Running => "RUNNING",
        Phase::Finished(FinishReason::EndOfProgram) => "FINISHED",
        Phase::Finished(FinishReason::InvalidInstructionPointer) => "BAD RIP",
    }
}

fn phase_color(app: &App) -> Color {
    match app.snapshot.phase {
        Phase::Ready => Color::Blue,
        Phase::Running => Color::Green,
        Phase::Finished(FinishReason::EndOfProgram) => Color::Gray,
        Phase::Finished(FinishReason::InvalidInstructionPointer) => Color::Red,
    }
}

fn run_text(app: &App) -> &'static str {
    if app.is_running { "AUTO" } else { "PAUSE" }
}

fn run_color(app: &App) -> Color {
    if app.is_running { Color::Green } else { Color::Red }
}

fn format_text(app: &App) -> &'static str {
    match app.fmt_mode {
        FormatMode::Hex => "HEX",
        FormatMode::Dec => "DEC",
    }
}

fn format_color(app: &App) -> Color {
    match app.fmt_mode {
        FormatMode::Hex => Color::Magenta,
        FormatMode::Dec => Color::Cyan,
    }
}

fn button_span(text: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!("[{text}]"),
        Style::default().fg(Color::Black).bg(color),
    )
}
