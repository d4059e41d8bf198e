//! Memory Initialization File (MIF) dump of a word range.
//!
//! Output layout:
//!
//! ```text
//! DEPTH = <last - first + 4>;
//! WIDTH = 32;
//! ADDRESS_RADIX = HEX;
//! DATA_RADIX = HEX;
//! CONTENT
//! BEGIN
//! 00000000 : 000000ff;
//! ...
//! END;
//! ```
//!
//! Addresses are relative to `first`. The dump stops early at the first word
//! that has never been written.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::WORD_LENGTH_BYTES;

/// Format the words in `[first, last]` using `read` to fetch each word.
pub fn dump<F>(first: u32, last: u32, read: F) -> String
where
    F: Fn(u32) -> Option<u32>,
{
    let mut s = String::new();
    let depth = last as i64 - first as i64 + WORD_LENGTH_BYTES as i64;
    let _ = writeln!(s, "DEPTH = {};", depth);
    s.push_str("WIDTH = 32;\n");
    s.push_str("ADDRESS_RADIX = HEX;\n");
    s.push_str("DATA_RADIX = HEX;\n");
    s.push_str("CONTENT\n");
    s.push_str("BEGIN\n");
    let mut address = first as u64;
    while address <= last as u64 {
        let word = match read(address as u32) {
            Some(w) => w,
            None => break,
        };
        let _ = writeln!(s, "{:08x} : {:08x};", address as u32 - first, word);
        address += WORD_LENGTH_BYTES as u64;
    }
    s.push_str("END;\n");
    s
}

/// Write a dump to `path`.
pub fn save<F>(path: &Path, first: u32, last: u32, read: F) -> Result<()>
where
    F: Fn(u32) -> Option<u32>,
{
    std::fs::write(path, dump(first, last, read))?;
    log::info!("MIF dump 0x{:08X}..=0x{:08X} written to {}", first, last, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::WriteWidth;
    use crate::memory::Memory;

    #[test]
    fn test_dump_layout() {
        let mut mem = Memory::new();
        mem.store(0x1000, 0xFF, WriteWidth::Word);
        mem.store(0x1004, 0xDEADBEEF, WriteWidth::Word);
        let text = dump(0x1000, 0x1004, |a| mem.load_word(a));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "DEPTH = 8;",
                "WIDTH = 32;",
                "ADDRESS_RADIX = HEX;",
                "DATA_RADIX = HEX;",
                "CONTENT",
                "BEGIN",
                "00000000 : 000000ff;",
                "00000004 : deadbeef;",
                "END;",
            ]
        );
    }

    #[test]
    fn test_dump_stops_at_unwritten_word() {
        let mut mem = Memory::new();
        mem.store(0x2000, 1, WriteWidth::Word);
        mem.store(0x2008, 3, WriteWidth::Word);
        let text = dump(0x2000, 0x200C, |a| mem.load_word(a));
        assert!(text.contains("00000000 : 00000001;"));
        assert!(!text.contains("00000008"));
        assert!(text.ends_with("END;\n"));
    }

    #[test]
    fn test_dump_reaches_top_of_memory() {
        let text = dump(0xFFFF_FFF8, 0xFFFF_FFFC, |_| Some(0));
        assert!(text.contains("00000004 : 00000000;"));
    }
}
