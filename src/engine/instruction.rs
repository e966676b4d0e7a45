// engine/instruction.rs
use super::registers::Register;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Reg(Register),
    /// `%name` that is not one of the 17 modelled registers; reads as 0.
    UnknownReg(String),
    /// `offset(%base)`
    Mem { offset: i64, base: Register },
    /// Anything else; reads as 0 and is not writable.
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Movq { src: Operand, dst: Operand },
    Addq { src: Operand, dst: Operand },
    Subq { src: Operand, dst: Operand },
    Imulq { src: Operand, dst: Operand },
    Pushq { src: Operand },
    Popq { dst: Operand },
    /// No label falls through after pushing the return address.
    Call { label: Option<String> },
    Ret,
}

/// Outcome of decoding one source line.
///
/// `Unknown` executes as a no-op. `Malformed` is a known opcode with the
/// wrong operand count and refuses to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Known(Op),
    Unknown(String),
    Malformed { opcode: String, reason: String },
}

impl Decoded {
    pub fn is_known(&self) -> bool {
        matches!(self, Decoded::Known(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub text: String,
    /// 1-based line in the loaded text.
    pub source_line: usize,
    /// 0-based index in the program; what `rip` holds.
    pub address: usize,
    pub decoded: Decoded,
}
