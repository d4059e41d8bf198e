//! Observed address window.
//!
//! The window spans one word per grid cell starting at the base address:
//! `high = base + rows * columns * 4`. Bases in the upper half of the address
//! space (kernel / memory-mapped I/O, 0x80000000 and up) can run past the end
//! of the 32-bit space; `high` is then clamped to the last word address,
//! 0xFFFFFFFC.

use crate::{MAX_WORD_ADDRESS, WORD_LENGTH_BYTES};

/// First address of the upper (kernel / MMIO) half of the address space.
pub const KERNEL_BASE: u32 = 0x8000_0000;

/// Store notification source. Implemented by the host memory.
///
/// Both bounds are inclusive. A second `subscribe` replaces the first range.
pub trait MemoryBus {
    fn subscribe(&mut self, low: u32, high: u32);
    fn unsubscribe(&mut self);
}

/// Address range the display listens to, plus whether it is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressWindow {
    low: u32,
    high: u32,
    subscribed: bool,
}

impl AddressWindow {
    pub fn new(base_address: u32, rows: usize, columns: usize) -> Self {
        let extent = rows as u64 * columns as u64 * WORD_LENGTH_BYTES as u64;
        let mut high = base_address as u64 + extent;
        if base_address >= KERNEL_BASE && high > MAX_WORD_ADDRESS as u64 {
            high = MAX_WORD_ADDRESS as u64;
        }
        AddressWindow {
            low: base_address,
            // Low-half bases cannot reach the top with any supported grid size
            high: high.min(MAX_WORD_ADDRESS as u64) as u32,
            subscribed: false,
        }
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    /// True if `address` lies in `[low, high]`.
    pub fn contains(&self, address: u32) -> bool {
        address >= self.low && address <= self.high
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Attach to `bus`. No effect if already attached.
    pub fn subscribe(&mut self, bus: &mut dyn MemoryBus) {
        if self.subscribed {
            return;
        }
        log::debug!("subscribe 0x{:08X}..=0x{:08X}", self.low, self.high);
        bus.subscribe(self.low, self.high);
        self.subscribed = true;
    }

    /// Detach from `bus`. No effect if not attached.
    pub fn unsubscribe(&mut self, bus: &mut dyn MemoryBus) {
        if !self.subscribed {
            return;
        }
        log::debug!("unsubscribe 0x{:08X}..=0x{:08X}", self.low, self.high);
        bus.unsubscribe();
        self.subscribed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBus {
        calls: Vec<Option<(u32, u32)>>,
    }

    impl MemoryBus for RecordingBus {
        fn subscribe(&mut self, low: u32, high: u32) {
            self.calls.push(Some((low, high)));
        }
        fn unsubscribe(&mut self) {
            self.calls.push(None);
        }
    }

    #[test]
    fn test_window_extent() {
        let w = AddressWindow::new(0x1001_0000, 240, 320);
        assert_eq!(w.low(), 0x1001_0000);
        assert_eq!(w.high(), 0x1001_0000 + 240 * 320 * 4);
        assert!(w.contains(0x1001_0000));
        assert!(w.contains(w.high()));
        assert!(!w.contains(0x1000_FFFC));
    }

    #[test]
    fn test_mmio_window_clamped() {
        // 0xFFFF0000 + 320*240*4 wraps the 32-bit space
        let w = AddressWindow::new(0xFFFF_0000, 240, 320);
        assert_eq!(w.high(), MAX_WORD_ADDRESS);

        // Small enough to fit: no clamping
        let w = AddressWindow::new(0xFFFF_0000, 8, 8);
        assert_eq!(w.high(), 0xFFFF_0100);
    }

    #[test]
    fn test_subscribe_idempotent() {
        let mut bus = RecordingBus::default();
        let mut w = AddressWindow::new(0x1000_0000, 2, 4);
        w.subscribe(&mut bus);
        w.subscribe(&mut bus);
        assert!(w.is_subscribed());
        assert_eq!(bus.calls, vec![Some((0x1000_0000, 0x1000_0020))]);

        w.unsubscribe(&mut bus);
        w.unsubscribe(&mut bus);
        assert!(!w.is_subscribed());
        assert_eq!(bus.calls.len(), 2);
        assert_eq!(bus.calls[1], None);
    }
}
