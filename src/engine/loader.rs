// engine/loader.rs
use std::collections::HashMap;

use tracing::{debug, warn};

use super::decoder::decode;
use super::errors::LoadError;
use super::instruction::{Decoded, Instruction};

/// Instructions in address order plus the label table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction at `rip`, if `rip` is inside the program.
    pub fn fetch(&self, rip: i64) -> Option<&Instruction> {
        usize::try_from(rip).ok().and_then(|i| self.instructions.get(i))
    }

    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}

pub fn load_bytes(bytes: &[u8]) -> Result<Program, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::NotUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    load(text)
}

/// Comments run from `#` to end of line. `name:` lines are labels bound to the
/// next instruction's address; `.directive` lines are skipped. Neither takes
/// an address.
pub fn load(text: &str) -> Result<Program, LoadError> {
    let mut program = Program::default();
    let mut addr = 0usize;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        if raw.chars().any(|c| c.is_control() && !c.is_whitespace()) {
            return Err(LoadError::Binary { line: line_no });
        }

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(label) = line.strip_suffix(':') {
            let label = label.trim();
            if let Some(prev) = program.labels.insert(label.to_string(), addr) {
                warn!(label, prev, addr, line = line_no, "label redefined");
            }
            continue;
        }
        if line.starts_with('.') {
            continue;
        }

        let decoded = decode(line);
        if let Decoded::Unknown(_) = &decoded {
            debug!(line = line_no, text = line, "unknown opcode, will execute as no-op");
        }
        program.instructions.push(Instruction {
            text: line.to_string(),
            source_line: line_no,
            address: addr,
            decoded,
        });
        addr += 1;
    }

    Ok(program)
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instruction::Op;

    #[test]
    fn labels_bind_to_next_instruction() {
        let src = "foo:\n  movq $1,%rax\nbar:\nbaz:\n  ret\n";
        let p = load(src).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.label("foo"), Some(0));
        assert_eq!(p.label("bar"), Some(1));
        assert_eq!(p.label("baz"), Some(1));
        assert_eq!(p.instructions[1].decoded, Decoded::Known(Op::Ret));
    }

    #[test]
    fn comments_blanks_and_directives_take_no_address() {
        let src = "  .text\n\n  .globl main\nmain:   # entry\n\tmovq $1,%rax # one\n# whole line\n  .LC0:\n  addq $2,%rax\n";
        let p = load(src).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.instructions[0].text, "movq $1,%rax");
        assert_eq!(p.instructions[0].source_line, 5);
        assert_eq!(p.instructions[0].address, 0);
        assert_eq!(p.instructions[1].source_line, 8);
        assert_eq!(p.instructions[1].address, 1);
        assert_eq!(p.label("main"), Some(0));
        assert_eq!(p.label(".LC0"), Some(1));
    }

    #[test]
    fn unknown_opcodes_are_kept() {
        let p = load("cmpq $0,%rax\njne .L3\n").unwrap();
        assert_eq!(p.len(), 2);
        assert!(p.instructions.iter().all(|i| matches!(i.decoded, Decoded::Unknown(_))));
    }

    #[test]
    fn later_label_wins() {
        let p = load("a:\nret\na:\nret\n").unwrap();
        assert_eq!(p.label("a"), Some(1));
    }

    #[test]
    fn fetch_bounds() {
        let p = load("ret\n").unwrap();
        assert!(p.fetch(0).is_some());
        assert!(p.fetch(1).is_none());
        assert!(p.fetch(-1).is_none());
    }

    #[test]
    fn binary_input_fails_closed() {
        assert_eq!(load("movq $1,%rax\n\0\0\n"), Err(LoadError::Binary { line: 2 }));
        assert_eq!(
            load_bytes(&[b'r', b'e', b't', 0xff]),
            Err(LoadError::NotUtf8 { valid_up_to: 3 })
        );
    }

    #[test]
    fn empty_text_is_empty_program() {
        assert!(load("").unwrap().is_empty());
        assert!(load("\n  # nothing\n").unwrap().is_empty());
    }
}
