#[derive(Default)]
pub struct ConsoleLine {
    pub text: String,
    pub is_error: bool,
}

#[derive(Default)]
pub struct Console {
    /// Lines to be rendered on screen
    pub lines: Vec<ConsoleLine>,
    /// Scroll offset from the bottom (0 = follow latest)
    pub scroll: usize,
}

impl Console {
    pub fn push_line<S: Into<String>>(&mut self, line: S) {
        self.lines.push(ConsoleLine { text: line.into(), is_error: false });
        self.scroll = 0;
    }

    pub fn push_error<S: Into<String>>(&mut self, line: S) {
        self.lines.push(ConsoleLine { text: line.into(), is_error: true });
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll = 0;
    }
}
