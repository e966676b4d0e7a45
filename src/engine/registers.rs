// engine/registers.rs
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const REGISTER_COUNT: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Rax, Rbx, Rcx, Rdx,
    Rsi, Rdi, Rsp, Rbp,
    Rip,
    R8, R9, R10, R11, R12, R13, R14, R15,
}

impl Register {
    /// Register-file order; also the display order.
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::Rax, Register::Rbx, Register::Rcx, Register::Rdx,
        Register::Rsi, Register::Rdi, Register::Rsp, Register::Rbp,
        Register::Rip,
        Register::R8, Register::R9, Register::R10, Register::R11,
        Register::R12, Register::R13, Register::R14, Register::R15,
    ];

    #[inline] pub fn index(self) -> usize { self as usize }

    pub fn name(self) -> &'static str {
        match self {
            Register::Rax => "rax", Register::Rbx => "rbx",
            Register::Rcx => "rcx", Register::Rdx => "rdx",
            Register::Rsi => "rsi", Register::Rdi => "rdi",
            Register::Rsp => "rsp", Register::Rbp => "rbp",
            Register::Rip => "rip",
            Register::R8 => "r8", Register::R9 => "r9",
            Register::R10 => "r10", Register::R11 => "r11",
            Register::R12 => "r12", Register::R13 => "r13",
            Register::R14 => "r14", Register::R15 => "r15",
        }
    }

    /// Name without the `%` sigil, e.g. `rax`.
    pub fn from_name(s: &str) -> Option<Register> {
        let s = s.trim().to_ascii_lowercase();
        Register::ALL.into_iter().find(|r| r.name() == s)
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    slots: [i64; REGISTER_COUNT],
}

impl RegisterFile {
    /// `rsp`/`rbp` start at `stack_base`, `rip` at `entry`, everything else 0.
    pub fn new(stack_base: i64, entry: i64) -> Self {
        let mut regs = RegisterFile { slots: [0; REGISTER_COUNT] };
        regs.write(Register::Rsp, stack_base);
        regs.write(Register::Rbp, stack_base);
        regs.write(Register::Rip, entry);
        regs
    }

    #[inline] pub fn read(&self, r: Register) -> i64 { self.slots[r.index()] }
    #[inline] pub fn write(&mut self, r: Register, v: i64) { self.slots[r.index()] = v; }

    pub fn iter(&self) -> impl Iterator<Item = (Register, i64)> + '_ {
        Register::ALL.into_iter().map(|r| (r, self.read(r)))
    }
}

impl Serialize for RegisterFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(REGISTER_COUNT))?;
        for (reg, value) in self.iter() {
            map.serialize_entry(reg.name(), &value)?;
        }
        map.end()
    }
}
