// engine/session.rs
use tracing::{debug, info, warn};

use super::config::EngineConfig;
use super::errors::{FinishReason, LoadError, StepError};
use super::exec::{Flow, execute};
use super::format::{Phase, Snapshot, modified_registers};
use super::history::History;
use super::instruction::Decoded;
use super::loader::{self, Program};
use super::machine::MachineState;
use super::registers::Register;

/// One debugging conversation: a loaded program, its machine state and the
/// undo history. Not shared; see [`SessionRegistry`](super::SessionRegistry)
/// for multi-client access.
#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    program: Program,
    state: MachineState,
    history: History,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Session {
    /// An empty session; it is finished until a program is started.
    pub fn new(config: EngineConfig) -> Self {
        let mut session = Self {
            state: MachineState::new(config.stack_base, 0),
            history: History::with_limit(config.history_limit),
            program: Program::default(),
            config,
        };
        session.mark_end();
        session
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Parses `text` and resets all state. On a load error the session is left
    /// as it was.
    pub fn start_execution(&mut self, text: &str) -> Result<Snapshot, LoadError> {
        let program = loader::load(text)?;
        Ok(self.install(program))
    }

    pub fn start_execution_bytes(&mut self, bytes: &[u8]) -> Result<Snapshot, LoadError> {
        let program = loader::load_bytes(bytes)?;
        Ok(self.install(program))
    }

    fn install(&mut self, program: Program) -> Snapshot {
        let entry = program.label(&self.config.entry_label).unwrap_or(0);
        self.program = program;
        self.state = MachineState::new(self.config.stack_base, entry as i64);
        self.history = History::with_limit(self.config.history_limit);
        self.mark_end();
        info!(
            instructions = self.program.len(),
            labels = self.program.labels.len(),
            entry,
            "program loaded"
        );
        self.current_state()
    }

    /// Executes the instruction at `rip`.
    pub fn step_forward(&mut self) -> Result<Snapshot, StepError> {
        if let Some(reason) = self.state.finished {
            return Err(StepError::ExecutionFinished(reason));
        }

        let rip = self.state.rip();
        let Some(instr) = self.program.fetch(rip) else {
            self.history.push(self.state.clone());
            self.state.finished = Some(FinishReason::InvalidInstructionPointer);
            warn!(rip, "instruction pointer outside program");
            return Err(StepError::InvalidInstructionPointer { rip });
        };

        let op = match &instr.decoded {
            Decoded::Known(op) => Some(op),
            Decoded::Unknown(_) => None,
            Decoded::Malformed { reason, .. } => {
                return Err(StepError::Malformed {
                    line: instr.source_line,
                    text: instr.text.clone(),
                    reason: reason.clone(),
                });
            }
        };

        self.history.push(self.state.clone());
        let baseline = self.state.regs;

        let flow = match op {
            Some(op) => execute(op, &mut self.state, &self.program.labels),
            None => Flow::Next,
        };
        let next = match flow {
            Flow::Next => rip.wrapping_add(1),
            Flow::Jump(target) => target,
        };
        self.state.regs.write(Register::Rip, next);
        self.state.step_count += 1;
        self.state.current_line = instr.source_line;
        self.state.modified = modified_registers(Some(&baseline), &self.state.regs);
        debug!(
            step = self.state.step_count,
            line = instr.source_line,
            text = instr.text.as_str(),
            rip = next,
            "stepped"
        );
        self.mark_end();

        Ok(self.current_state())
    }

    /// Restores the state from before the most recent forward step.
    pub fn step_back(&mut self) -> Result<Snapshot, StepError> {
        let Some(previous) = self.history.pop() else {
            return Err(StepError::NoHistory);
        };
        self.state = previous;
        self.state.modified =
            modified_registers(self.history.top().map(|s| &s.regs), &self.state.regs);
        debug!(step = self.state.step_count, depth = self.history.len(), "stepped back");
        Ok(self.current_state())
    }

    pub fn current_state(&self) -> Snapshot {
        Snapshot {
            registers: self.state.regs,
            stack: self.state.stack_window(self.config.window()),
            current_line: self.state.current_line,
            next_line: self.program.fetch(self.state.rip()).map(|i| i.source_line),
            step_count: self.state.step_count,
            modified: self.state.modified.clone(),
            phase: self.phase(),
            history_depth: self.history.len(),
            history_evicted: self.history.evicted(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state.finished {
            Some(reason) => Phase::Finished(reason),
            None if self.state.step_count == 0 => Phase::Ready,
            None => Phase::Running,
        }
    }

    // Running at or past the last instruction is a normal end; a negative rip
    // is caught by the next step.
    fn mark_end(&mut self) {
        if self.state.finished.is_none() && self.state.rip() >= self.program.len() as i64 {
            self.state.finished = Some(FinishReason::EndOfProgram);
        }
    }
}
