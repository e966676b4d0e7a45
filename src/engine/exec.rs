// engine/exec.rs
use std::collections::HashMap;

use tracing::warn;

use super::instruction::{Op, Operand};
use super::machine::MachineState;
use super::memory::{Memory, WORD};
use super::registers::{Register, RegisterFile};

/// Where `rip` goes after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    Jump(i64),
}

/// Applies `op` to the machine. `rip` is read but never written here; the
/// caller applies the returned [`Flow`].
pub fn execute(op: &Op, m: &mut MachineState, labels: &HashMap<String, usize>) -> Flow {
    let MachineState { regs, mem, .. } = m;
    match op {
        Op::Movq { src, dst } => {
            let v = read(src, regs, mem);
            write(dst, v, regs, mem);
        }
        Op::Addq { src, dst } => {
            let v = read(dst, regs, mem).wrapping_add(read(src, regs, mem));
            write(dst, v, regs, mem);
        }
        Op::Subq { src, dst } => {
            let v = read(dst, regs, mem).wrapping_sub(read(src, regs, mem));
            write(dst, v, regs, mem);
        }
        Op::Imulq { src, dst } => {
            let v = read(dst, regs, mem).wrapping_mul(read(src, regs, mem));
            write(dst, v, regs, mem);
        }
        Op::Pushq { src } => {
            let v = read(src, regs, mem);
            push(v, regs, mem);
        }
        Op::Popq { dst } => {
            let v = mem.read(regs.read(Register::Rsp));
            write(dst, v, regs, mem);
            let sp = regs.read(Register::Rsp).wrapping_add(WORD);
            regs.write(Register::Rsp, sp);
        }
        Op::Call { label } => {
            let ret = regs.read(Register::Rip).wrapping_add(1);
            push(ret, regs, mem);
            let Some(label) = label else {
                warn!("call without a target, falling through");
                return Flow::Next;
            };
            match labels.get(label) {
                Some(&target) => return Flow::Jump(target as i64),
                None => warn!(label = label.as_str(), "call to undefined label, falling through"),
            }
        }
        Op::Ret => {
            let sp = regs.read(Register::Rsp);
            let target = mem.read(sp);
            regs.write(Register::Rsp, sp.wrapping_add(WORD));
            return Flow::Jump(target);
        }
    }
    Flow::Next
}

fn push(v: i64, regs: &mut RegisterFile, mem: &mut Memory) {
    let sp = regs.read(Register::Rsp).wrapping_sub(WORD);
    regs.write(Register::Rsp, sp);
    mem.write(sp, v);
}

fn read(op: &Operand, regs: &RegisterFile, mem: &Memory) -> i64 {
    match op {
        Operand::Imm(v) => *v,
        Operand::Reg(r) => regs.read(*r),
        Operand::Mem { offset, base } => mem.read(regs.read(*base).wrapping_add(*offset)),
        Operand::UnknownReg(name) => {
            warn!(register = name.as_str(), "read of unknown register, using 0");
            0
        }
        Operand::Unrecognized(text) => {
            warn!(operand = text.as_str(), "unrecognized operand, using 0");
            0
        }
    }
}

fn write(op: &Operand, v: i64, regs: &mut RegisterFile, mem: &mut Memory) {
    match op {
        Operand::Reg(r) => regs.write(*r, v),
        Operand::Mem { offset, base } => {
            let addr = regs.read(*base).wrapping_add(*offset);
            mem.write(addr, v);
        }
        Operand::Imm(_) | Operand::UnknownReg(_) | Operand::Unrecognized(_) => {
            warn!(?op, "operand is not writable, result dropped");
        }
    }
}
