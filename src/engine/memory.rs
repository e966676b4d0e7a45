use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::registers::{Register, RegisterFile};

pub const WORD: i64 = 8;

/// Sparse 64-bit word memory. Absent addresses read as 0.
///
/// Cells live behind an `Arc`, so cloning a `Memory` for the undo history is
/// O(1); the first write after a clone copies the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: Arc<BTreeMap<i64, i64>>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, addr: i64) -> i64 {
        self.cells.get(&addr).copied().unwrap_or(0)
    }

    pub fn write(&mut self, addr: i64, value: i64) {
        Arc::make_mut(&mut self.cells).insert(addr, value);
    }

    /// True if `addr` was ever written, even with 0.
    pub fn contains(&self, addr: i64) -> bool {
        self.cells.contains_key(&addr)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackEntry {
    /// `address - rbp`
    pub offset: i64,
    pub address: i64,
    pub value: i64,
    pub is_rsp: bool,
    pub is_rbp: bool,
    pub has_value: bool,
}

/// Bounds of the displayed stack slice.
#[derive(Debug, Clone, Copy)]
pub struct WindowSpec {
    pub margin: i64,
    pub max_entries: usize,
}

/// Walks from `rbp + margin` down to `rsp - margin` in word strides.
///
/// A frame larger than `max_entries` words keeps both ends, half each, and
/// skips the middle; the rows around `rsp` are never the ones dropped.
pub fn stack_window(regs: &RegisterFile, mem: &Memory, window: WindowSpec) -> Vec<StackEntry> {
    let rsp = regs.read(Register::Rsp);
    let rbp = regs.read(Register::Rbp);
    let top = rbp.saturating_add(window.margin);
    let low = rsp.saturating_sub(window.margin);
    if top < low || window.max_entries == 0 {
        return Vec::new();
    }

    let word = i128::from(WORD);
    let total = (i128::from(top) - i128::from(low)) / word + 1;
    let entry = |k: i128| {
        // top - k * WORD stays within [low, top]
        let addr = (i128::from(top) - k * word) as i64;
        StackEntry {
            offset: addr.wrapping_sub(rbp),
            address: addr,
            value: mem.read(addr),
            is_rsp: addr == rsp,
            is_rbp: addr == rbp,
            has_value: mem.contains(addr),
        }
    };

    let cap = window.max_entries as i128;
    if total <= cap {
        (0..total).map(entry).collect()
    } else {
        let head = cap / 2;
        let tail = cap - head;
        (0..head).chain(total - tail..total).map(entry).collect()
    }
}

/// True when `next` does not directly follow `prev` in a window, i.e. rows
/// were skipped between them.
pub fn is_gap(prev: &StackEntry, next: &StackEntry) -> bool {
    prev.address.wrapping_sub(next.address) != WORD
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: WindowSpec = WindowSpec { margin: 16, max_entries: 256 };

    #[test]
    fn absent_reads_zero() {
        let mut mem = Memory::new();
        assert_eq!(mem.read(992), 0);
        assert!(!mem.contains(992));
        mem.write(992, 0);
        assert!(mem.contains(992));
    }

    #[test]
    fn clone_is_isolated_from_later_writes() {
        let mut mem = Memory::new();
        mem.write(8, 1);
        let saved = mem.clone();
        mem.write(8, 2);
        mem.write(16, 3);
        assert_eq!(saved.read(8), 1);
        assert!(!saved.contains(16));
        assert_eq!(mem.read(8), 2);
    }

    #[test]
    fn window_at_reset_spans_five_words() {
        let regs = RegisterFile::new(1000, 0);
        let win = stack_window(&regs, &Memory::new(), WINDOW);
        let addrs: Vec<i64> = win.iter().map(|e| e.address).collect();
        assert_eq!(addrs, vec![1016, 1008, 1000, 992, 984]);
        assert_eq!(win[0].offset, 16);
        assert!(win[2].is_rsp && win[2].is_rbp);
        assert!(win.iter().all(|e| !e.has_value));
    }

    #[test]
    fn window_follows_pushed_rsp() {
        let mut regs = RegisterFile::new(1000, 0);
        let mut mem = Memory::new();
        regs.write(Register::Rsp, 992);
        mem.write(992, 5);
        let win = stack_window(&regs, &mem, WINDOW);
        assert_eq!(win.last().map(|e| e.address), Some(976));
        let top = win.iter().find(|e| e.is_rsp).unwrap();
        assert_eq!((top.address, top.value, top.offset), (992, 5, -8));
        assert!(top.has_value);
    }

    #[test]
    fn window_is_capped() {
        let mut regs = RegisterFile::new(1000, 0);
        regs.write(Register::Rsp, i64::MIN);
        let win = stack_window(&regs, &Memory::new(), WINDOW);
        assert_eq!(win.len(), 256);
        assert_eq!(win.last().map(|e| e.is_rsp), Some(true));
    }

    #[test]
    fn capped_window_keeps_both_ends() {
        let mut regs = RegisterFile::new(1000, 0);
        let mut mem = Memory::new();
        let rsp = 1000 - 4096;
        regs.write(Register::Rsp, rsp);
        mem.write(rsp, 7);
        mem.write(rsp + 8, 9);

        let win = stack_window(&regs, &mem, WINDOW);
        assert_eq!(win.len(), 256);
        assert_eq!(win[0].address, 1016);
        assert!(win[..128].iter().any(|e| e.is_rbp));

        let top = win.iter().find(|e| e.is_rsp).unwrap();
        assert_eq!(top.value, 7);
        assert!(win.iter().any(|e| e.address == rsp + 8 && e.value == 9));
        assert_eq!(win[255].address, rsp - 16);

        let gaps = win.windows(2).filter(|p| is_gap(&p[0], &p[1])).count();
        assert_eq!(gaps, 1);
        assert!(is_gap(&win[127], &win[128]));
    }

    #[test]
    fn uncapped_window_has_no_gaps() {
        let regs = RegisterFile::new(1000, 0);
        let win = stack_window(&regs, &Memory::new(), WINDOW);
        assert!(win.windows(2).all(|p| !is_gap(&p[0], &p[1])));
    }

    #[test]
    fn window_empty_when_rsp_above_rbp() {
        let mut regs = RegisterFile::new(1000, 0);
        regs.write(Register::Rsp, 2000);
        assert!(stack_window(&regs, &Memory::new(), WINDOW).is_empty());
    }
}
