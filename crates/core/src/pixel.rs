//! Packed 3-3-2 pixel decoding.
//!
//! Every byte stored into the display window is one pixel in `BBGGGRRR`
//! layout: bits 2:0 red, bits 5:3 green, bits 7:6 blue. Channels are widened
//! to 8 bits by bit replication (OR-ing shifted copies of the field), not by
//! linear scaling. The three overlapping shifts for a 3-bit field top out at
//! 0xFE, so full red or green decodes to 254 while full blue reaches 255.
//!
//! The transparent color is not a separate marker: it is whatever
//! [`TRANSPARENT_KEY`] decodes to. A stored pixel that decodes to the same
//! color is indistinguishable from "leave this cell alone".

/// Packed value whose decoded color marks a lane as transparent.
pub const TRANSPARENT_KEY: u8 = 0xC7;

/// 24-bit RGB color, one cell of the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Build from `0x00RRGGBB`.
    pub const fn from_u32(v: u32) -> Self {
        Rgb {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        }
    }

    /// Pack as `0x00RRGGBB` (minifb pixel format).
    pub const fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Expand a packed pixel to `0x00RRGGBB`.
#[inline]
pub const fn decode_u32(value: u8) -> u32 {
    let v = value as u32;
    let red = (v & 0x07) << 21 | (v & 0x07) << 18 | (v & 0x06) << 16;
    let green = (v & 0x38) << 10 | (v & 0x38) << 7 | (v & 0x30) << 5;
    let blue = (v & 0xC0) | (v & 0xC0) >> 2 | (v & 0xC0) >> 4 | (v & 0xC0) >> 6;
    red | green | blue
}

/// Expand a packed pixel to a full color. Total over all byte values.
#[inline]
pub const fn decode(value: u8) -> Rgb {
    Rgb::from_u32(decode_u32(value))
}

/// Decoded color of [`TRANSPARENT_KEY`].
pub const TRANSPARENT: Rgb = decode(TRANSPARENT_KEY);

/// The transparent sentinel color.
pub const fn transparent() -> Rgb {
    TRANSPARENT
}

/// True if `color` equals the transparent sentinel.
#[inline]
pub fn is_transparent(color: Rgb) -> bool {
    color == TRANSPARENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_black() {
        assert_eq!(decode(0x00), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_decode_full_scale() {
        // 3-bit channels saturate at 0xFE, the 2-bit channel reaches 0xFF
        assert_eq!(decode(0xFF), Rgb::new(254, 254, 255));
    }

    #[test]
    fn test_decode_primaries() {
        assert_eq!(decode(0x07), Rgb::new(254, 0, 0));
        assert_eq!(decode(0x38), Rgb::new(0, 254, 0));
        assert_eq!(decode(0xC0), Rgb::new(0, 0, 255));
        assert_eq!(decode(0x01), Rgb::new(0x24, 0, 0));
        assert_eq!(decode(0x40), Rgb::new(0, 0, 0x55));
    }

    #[test]
    fn test_transparent_sentinel() {
        assert_eq!(transparent(), Rgb::new(254, 0, 255));
        assert!(is_transparent(decode(TRANSPARENT_KEY)));
        let hits: Vec<u8> = (0..=255u8).filter(|&v| is_transparent(decode(v))).collect();
        assert_eq!(hits, vec![TRANSPARENT_KEY]);
    }

    #[test]
    fn test_no_cross_channel_leakage() {
        for v in 0..=255u8 {
            let c = decode(v);
            for bit in 0..8 {
                let flipped = decode(v ^ (1 << bit));
                if bit >= 3 {
                    assert_eq!(flipped.r, c.r, "red changed: v=0x{:02X} bit {}", v, bit);
                }
                if bit < 3 || bit >= 6 {
                    assert_eq!(flipped.g, c.g, "green changed: v=0x{:02X} bit {}", v, bit);
                }
                if bit < 6 {
                    assert_eq!(flipped.b, c.b, "blue changed: v=0x{:02X} bit {}", v, bit);
                }
            }
        }
    }

    #[test]
    fn test_u32_packing() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_u32(), 0x123456);
        assert_eq!(Rgb::from_u32(0xFF123456), c);
        assert_eq!(decode_u32(0xFF), 0xFEFEFF);
    }
}
