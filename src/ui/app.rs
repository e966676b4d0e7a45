use super::{console::Console, input::handle_key, view::ui};
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use revasm::engine::{FinishReason, Session, Snapshot, StepError};
use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::debug;

#[derive(PartialEq, Eq, Copy, Clone)]
pub(super) enum FormatMode {
    Hex,
    Dec,
}

pub struct App {
    pub(super) session: Session,
    pub(super) path: PathBuf,
    pub(super) source: Vec<String>,
    pub(super) snapshot: Snapshot,

    // Load diagnostics
    pub(super) load_ok: bool,
    pub(super) load_msg: String,

    // Run control
    pub(super) is_running: bool,
    pub(super) last_step_time: Instant,
    pub(super) step_interval: Duration,
    pub(super) fmt_mode: FormatMode,
    pub(super) should_quit: bool,

    // Messages from the engine
    pub(super) console: Console,
}

impl App {
    pub fn new(session: Session, path: PathBuf, text: String) -> Self {
        let snapshot = session.current_state();
        let mut app = Self {
            session,
            path,
            source: Vec::new(),
            snapshot,
            load_ok: false,
            load_msg: String::new(),
            is_running: false,
            last_step_time: Instant::now(),
            step_interval: Duration::from_millis(250),
            fmt_mode: FormatMode::Dec,
            should_quit: false,
            console: Console::default(),
        };
        app.load(text);
        app
    }

    fn load(&mut self, text: String) {
        self.is_running = false;
        match self.session.start_execution(&text) {
            Ok(snap) => {
                let program = self.session.program();
                let unknown = program
                    .instructions
                    .iter()
                    .filter(|i| !i.decoded.is_known())
                    .count();
                self.load_msg = format!(
                    "Loaded {} instructions, {} labels from {}{}",
                    program.len(),
                    program.labels.len(),
                    self.path.display(),
                    if unknown > 0 {
                        format!(" ({unknown} will run as no-op)")
                    } else {
                        String::new()
                    }
                );
                self.load_ok = true;
                self.snapshot = snap;
                self.source = text.lines().map(str::to_string).collect();
            }
            Err(e) => {
                self.load_msg = format!("Load error: {e}");
                self.load_ok = false;
                self.console.push_error(self.load_msg.clone());
            }
        }
    }

    /// Re-reads the file from disk and starts over.
    pub(super) fn restart(&mut self) {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                self.load(text);
                self.console.push_line("Restarted");
            }
            Err(e) => self
                .console
                .push_error(format!("reading {}: {e}", self.path.display())),
        }
    }

    pub(super) fn step_forward(&mut self) {
        let res = self.session.step_forward();
        self.apply(res);
    }

    pub(super) fn step_back(&mut self) {
        self.is_running = false;
        let res = self.session.step_back();
        self.apply(res);
    }

    fn apply(&mut self, res: Result<Snapshot, StepError>) {
        match res {
            Ok(snap) => self.snapshot = snap,
            Err(StepError::ExecutionFinished(FinishReason::EndOfProgram)) => {
                self.is_running = false;
                self.console.push_line("Execution finished");
            }
            Err(e) => {
                self.is_running = false;
                self.console.push_error(e.to_string());
                self.snapshot = self.session.current_state();
            }
        }
    }

    fn tick(&mut self) {
        if self.is_running && self.last_step_time.elapsed() >= self.step_interval {
            self.step_forward();
            if self.snapshot.is_finished() {
                self.is_running = false;
            }
            self.last_step_time = Instant::now();
        }
    }
}

pub fn run(terminal: &mut DefaultTerminal, mut app: App) -> io::Result<()> {
    terminal.draw(|f| ui(f, &app))?;
    let mut last_draw = Instant::now();
    loop {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(&mut app, key)? {
                    break;
                }
            }
        }
        if app.should_quit {
            break;
        }
        app.tick();
        // ~60 FPS cap
        if last_draw.elapsed() >= Duration::from_millis(16) {
            terminal.draw(|f| ui(f, &app))?;
            last_draw = Instant::now();
        }
    }
    debug!(steps = app.snapshot.step_count, "leaving tui");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_reload_keeps_listing_of_running_program() {
        let good = "movq $1,%rax\nmovq $2,%rbx\n".to_string();
        let mut app = App::new(Session::default(), PathBuf::from("prog.s"), good);
        app.step_forward();
        assert!(app.load_ok);

        app.load("ret\n\u{0}\n".to_string());
        assert!(!app.load_ok);
        assert_eq!(app.source, vec!["movq $1,%rax", "movq $2,%rbx"]);
        assert_eq!(app.snapshot.next_line, Some(2));
        assert_eq!(app.console.lines.last().map(|l| l.is_error), Some(true));
    }

    #[test]
    fn reload_replaces_listing() {
        let mut app = App::new(Session::default(), PathBuf::from("prog.s"), "ret\n".into());
        app.load("movq $1,%rax\nret\n".to_string());
        assert!(app.load_ok);
        assert_eq!(app.source.len(), 2);
        assert_eq!(app.snapshot.step_count, 0);
    }
}
