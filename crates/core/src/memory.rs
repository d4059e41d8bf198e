//! Simulated 32-bit memory with a single observed range.
//!
//! Sparse and word-granular: only words that have been stored to exist.
//! Words are little-endian, so byte `address & 3` of a word is bits
//! `8 * (address & 3)` and up. Stores are aligned down to their width.
//!
//! A store whose bytes intersect the observed range produces a
//! [`WriteEvent`] for the caller to forward to the display.

use std::collections::BTreeMap;

use crate::handler::{WriteEvent, WriteWidth};
use crate::window::MemoryBus;

/// Simulated data memory.
#[derive(Debug, Default)]
pub struct Memory {
    words: BTreeMap<u32, u32>,
    /// Inclusive observed range, if subscribed
    observed: Option<(u32, u32)>,
    /// Stores that produced a notification
    pub notify_count: u64,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the low `width` bytes of `value` at `address`.
    pub fn store(&mut self, address: u32, value: u32, width: WriteWidth) -> Option<WriteEvent> {
        let address = address & !(width.bytes() - 1);
        let word_addr = address & !3;
        let shift = (address & 3) * 8;
        let mask = width.mask();
        let value = value & mask;

        let word = self.words.entry(word_addr).or_insert(0);
        *word = (*word & !(mask << shift)) | (value << shift);

        if self.observes(address, width) {
            self.notify_count += 1;
            Some(WriteEvent::new(address, value, width))
        } else {
            None
        }
    }

    fn observes(&self, address: u32, width: WriteWidth) -> bool {
        match self.observed {
            Some((low, high)) => {
                let last = address as u64 + width.bytes() as u64 - 1;
                address <= high && last >= low as u64
            }
            None => false,
        }
    }

    /// Word at `address` (aligned down), or `None` if never written.
    pub fn load_word(&self, address: u32) -> Option<u32> {
        self.words.get(&(address & !3)).copied()
    }

    /// Byte at `address`; unwritten memory reads as zero.
    pub fn load_byte(&self, address: u32) -> u8 {
        self.load_word(address)
            .map(|w| (w >> ((address & 3) * 8)) as u8)
            .unwrap_or(0)
    }

    pub fn observed_range(&self) -> Option<(u32, u32)> {
        self.observed
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

impl MemoryBus for Memory {
    fn subscribe(&mut self, low: u32, high: u32) {
        self.observed = Some((low, high));
    }

    fn unsubscribe(&mut self) {
        self.observed = None;
    }
}
