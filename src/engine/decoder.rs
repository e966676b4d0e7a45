// engine/decoder.rs
use super::instruction::{Decoded, Op, Operand};
use super::registers::Register;

/// Decodes one cleaned source line, e.g. `addq $1, -8(%rbp)`.
///
/// `call` only looks at its first operand and `ret` ignores operands, so
/// neither can be malformed.
pub fn decode(text: &str) -> Decoded {
    let mut parts = text.split_whitespace();
    let Some(opcode) = parts.next() else {
        return Decoded::Unknown(String::new());
    };
    let mnemonic = opcode.to_ascii_lowercase();
    let rest = parts.collect::<String>();
    let ops = split_operands(&rest);

    let op = match mnemonic.as_str() {
        "movq" => binary(&ops, |src, dst| Op::Movq { src, dst }),
        "addq" => binary(&ops, |src, dst| Op::Addq { src, dst }),
        "subq" => binary(&ops, |src, dst| Op::Subq { src, dst }),
        "imulq" => binary(&ops, |src, dst| Op::Imulq { src, dst }),
        "pushq" => match ops.as_slice() {
            [src] => Ok(Op::Pushq { src: parse_operand(src) }),
            _ => Err("expected 'src'"),
        },
        "popq" => match ops.as_slice() {
            [dst] => Ok(Op::Popq { dst: parse_operand(dst) }),
            _ => Err("expected 'dst'"),
        },
        "call" => Ok(Op::Call { label: ops.first().cloned() }),
        "ret" => Ok(Op::Ret),
        _ => return Decoded::Unknown(text.to_string()),
    };

    match op {
        Ok(op) => Decoded::Known(op),
        Err(reason) => Decoded::Malformed { opcode: mnemonic, reason: reason.to_string() },
    }
}

fn binary(ops: &[String], build: impl FnOnce(Operand, Operand) -> Op) -> Result<Op, &'static str> {
    match ops {
        [src, dst] => Ok(build(parse_operand(src), parse_operand(dst))),
        _ => Err("expected 'src,dst'"),
    }
}

pub(crate) fn split_operands(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|t| t.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn parse_operand(s: &str) -> Operand {
    let s = s.trim();
    if let Some(imm) = s.strip_prefix('$') {
        return match parse_imm(imm) {
            Some(v) => Operand::Imm(v),
            None => Operand::Unrecognized(s.to_string()),
        };
    }
    if let Some(name) = s.strip_prefix('%') {
        return match Register::from_name(name) {
            Some(r) => Operand::Reg(r),
            None => Operand::UnknownReg(name.to_string()),
        };
    }
    parse_memop(s).unwrap_or_else(|| Operand::Unrecognized(s.to_string()))
}

pub(crate) fn parse_imm(s: &str) -> Option<i64> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(d) => (true, d),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if neg { magnitude.wrapping_neg() } else { magnitude })
}

// "imm(%reg)" or "(%reg)"
fn parse_memop(op: &str) -> Option<Operand> {
    let (imm_s, rest) = op.split_once('(')?;
    let reg_s = rest.strip_suffix(')')?.trim().strip_prefix('%')?;
    let offset = if imm_s.trim().is_empty() { 0 } else { parse_imm(imm_s)? };
    let base = Register::from_name(reg_s)?;
    Some(Operand::Mem { offset, base })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_operand_forms() {
        assert_eq!(
            decode("movq $10,%rax"),
            Decoded::Known(Op::Movq { src: Operand::Imm(10), dst: Operand::Reg(Register::Rax) })
        );
        assert_eq!(
            decode("addq %rbx, -8(%rbp)"),
            Decoded::Known(Op::Addq {
                src: Operand::Reg(Register::Rbx),
                dst: Operand::Mem { offset: -8, base: Register::Rbp },
            })
        );
        assert_eq!(
            decode("IMULQ $0x10 , %r8"),
            Decoded::Known(Op::Imulq { src: Operand::Imm(16), dst: Operand::Reg(Register::R8) })
        );
    }

    #[test]
    fn memory_operand_without_offset() {
        assert_eq!(parse_operand("(%rsp)"), Operand::Mem { offset: 0, base: Register::Rsp });
        assert_eq!(parse_operand("16(%r12)"), Operand::Mem { offset: 16, base: Register::R12 });
        assert_eq!(parse_operand("8(%xyz)"), Operand::Unrecognized("8(%xyz)".into()));
    }

    #[test]
    fn permissive_operands() {
        assert_eq!(parse_operand("%eax"), Operand::UnknownReg("eax".into()));
        assert_eq!(parse_operand("$abc"), Operand::Unrecognized("$abc".into()));
        assert_eq!(parse_operand("foo"), Operand::Unrecognized("foo".into()));
    }

    #[test]
    fn unknown_opcode_is_visible() {
        assert_eq!(decode("cmpq $1,%rax"), Decoded::Unknown("cmpq $1,%rax".into()));
        assert_eq!(decode("jmp .L2"), Decoded::Unknown("jmp .L2".into()));
        assert!(!decode("leave").is_known());
    }

    #[test]
    fn arity_errors_are_malformed() {
        assert!(matches!(decode("movq %rax"), Decoded::Malformed { .. }));
        assert!(matches!(decode("pushq"), Decoded::Malformed { .. }));
        assert!(matches!(decode("popq %rax,%rbx"), Decoded::Malformed { .. }));
        assert!(matches!(decode("IMULQ $1"), Decoded::Malformed { ref opcode, .. } if opcode == "imulq"));
    }

    #[test]
    fn call_and_ret() {
        assert_eq!(decode("call foo"), Decoded::Known(Op::Call { label: Some("foo".into()) }));
        assert_eq!(decode("ret"), Decoded::Known(Op::Ret));
    }

    #[test]
    fn call_and_ret_tolerate_operand_counts() {
        assert_eq!(decode("call"), Decoded::Known(Op::Call { label: None }));
        assert_eq!(decode("call f, g"), Decoded::Known(Op::Call { label: Some("f".into()) }));
        assert_eq!(decode("ret $8"), Decoded::Known(Op::Ret));
    }

    #[test]
    fn immediates() {
        assert_eq!(parse_imm("-8"), Some(-8));
        assert_eq!(parse_imm("0xff"), Some(255));
        assert_eq!(parse_imm("-0x10"), Some(-16));
        assert_eq!(parse_imm(""), None);
    }
}
