use super::errors::FinishReason;
use super::memory::{Memory, StackEntry, WindowSpec, stack_window};
use super::registers::{Register, RegisterFile};

/// Everything one step can change. Cloned whole into the undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineState {
    pub regs: RegisterFile,
    pub mem: Memory,
    /// Source line of the last executed instruction, 0 before the first step.
    pub current_line: usize,
    pub step_count: u64,
    pub finished: Option<FinishReason>,
    pub modified: Vec<Register>,
}

impl MachineState {
    pub fn new(stack_base: i64, entry: i64) -> Self {
        Self {
            regs: RegisterFile::new(stack_base, entry),
            mem: Memory::new(),
            current_line: 0,
            step_count: 0,
            finished: None,
            modified: Vec::new(),
        }
    }

    #[inline] pub fn rip(&self) -> i64 { self.regs.read(Register::Rip) }

    pub fn stack_window(&self, window: WindowSpec) -> Vec<StackEntry> {
        stack_window(&self.regs, &self.mem, window)
    }
}
