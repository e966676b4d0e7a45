use serde::Serialize;

use super::errors::FinishReason;
use super::memory::{StackEntry, is_gap};
use super::registers::{Register, RegisterFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Phase {
    /// Loaded, nothing executed yet.
    Ready,
    Running,
    Finished(FinishReason),
}

/// What callers see after every operation. Never aliases session internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub registers: RegisterFile,
    pub stack: Vec<StackEntry>,
    /// Line of the last executed instruction; 0 before the first step.
    pub current_line: usize,
    /// Line of the instruction at `rip`, if any.
    pub next_line: Option<usize>,
    pub step_count: u64,
    pub modified: Vec<Register>,
    pub phase: Phase,
    pub history_depth: usize,
    /// Undo entries dropped by the history limit since the last load.
    pub history_evicted: u64,
}

impl Snapshot {
    pub fn reg(&self, r: Register) -> i64 {
        self.registers.read(r)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }
}

/// Registers whose values differ, in register-file order.
pub fn modified_registers(previous: Option<&RegisterFile>, current: &RegisterFile) -> Vec<Register> {
    let Some(previous) = previous else {
        return Vec::new();
    };
    Register::ALL
        .into_iter()
        .filter(|&r| previous.read(r) != current.read(r))
        .collect()
}

/// Fixed-width text rendering used by `revasm trace`.
pub fn render_text(s: &Snapshot) -> String {
    let mut out = String::new();
    let phase = match s.phase {
        Phase::Ready => "ready".to_string(),
        Phase::Running => "running".to_string(),
        Phase::Finished(reason) => format!("finished ({reason})"),
    };
    out.push_str(&format!(
        "step {:>4}  line {:>4}  {phase}\n",
        s.step_count, s.current_line
    ));
    for chunk in Register::ALL.chunks(6) {
        let row: Vec<String> = chunk
            .iter()
            .map(|&r| {
                let mark = if s.modified.contains(&r) { '*' } else { ' ' };
                format!("{mark}{:<3}={:>8}", r.name(), s.reg(r))
            })
            .collect();
        out.push_str(&row.join(" "));
        out.push('\n');
    }
    for (i, e) in s.stack.iter().enumerate() {
        if i > 0 && is_gap(&s.stack[i - 1], e) {
            out.push_str("  ...\n");
        }
        let tag = match (e.is_rbp, e.is_rsp) {
            (true, true) => "<- rbp,rsp",
            (true, false) => "<- rbp",
            (false, true) => "<- rsp",
            (false, false) => "",
        };
        out.push_str(&format!(
            "  {:>+5}  0x{:06x}  {:>10}  {tag}\n",
            e.offset, e.address, e.value
        ));
    }
    out
}
