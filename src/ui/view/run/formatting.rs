use super::FormatMode;

pub(super) fn format_value(value: i64, fmt: FormatMode) -> String {
    match fmt {
        FormatMode::Dec => format!("{value}"),
        FormatMode::Hex if value < 0 => format!("-0x{:x}", value.unsigned_abs()),
        FormatMode::Hex => format!("0x{value:x}"),
    }
}

pub(super) fn format_address(addr: i64) -> String {
    if addr < 0 {
        format!("-0x{:04x}", addr.unsigned_abs())
    } else {
        format!("0x{addr:04x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_keeps_sign() {
        assert_eq!(format_value(255, FormatMode::Hex), "0xff");
        assert_eq!(format_value(-16, FormatMode::Hex), "-0x10");
        assert_eq!(format_value(-16, FormatMode::Dec), "-16");
        assert_eq!(format_address(1000), "0x03e8");
    }
}
