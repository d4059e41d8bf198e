//! Display configuration: closed option sets and the derived grid size.
//!
//! Every option comes from a fixed list. Parsing a choice that is not on the
//! list is a programming error on the caller's side, so
//! [`parse_or_default`] logs it and falls back to the option's default
//! instead of failing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DisplayError;

/// Pixel size of one grid cell along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitSize {
    X1,
    X2,
    X4,
    X8,
    X16,
    X32,
}

impl UnitSize {
    pub const ALL: [UnitSize; 6] = [
        UnitSize::X1,
        UnitSize::X2,
        UnitSize::X4,
        UnitSize::X8,
        UnitSize::X16,
        UnitSize::X32,
    ];

    pub fn pixels(self) -> usize {
        match self {
            UnitSize::X1 => 1,
            UnitSize::X2 => 2,
            UnitSize::X4 => 4,
            UnitSize::X8 => 8,
            UnitSize::X16 => 16,
            UnitSize::X32 => 32,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

impl Default for UnitSize {
    fn default() -> Self {
        UnitSize::X1
    }
}

/// Display area width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayWidth {
    W64,
    W128,
    W256,
    W320,
    W512,
    W640,
    W800,
    W1024,
}

impl DisplayWidth {
    pub const ALL: [DisplayWidth; 8] = [
        DisplayWidth::W64,
        DisplayWidth::W128,
        DisplayWidth::W256,
        DisplayWidth::W320,
        DisplayWidth::W512,
        DisplayWidth::W640,
        DisplayWidth::W800,
        DisplayWidth::W1024,
    ];

    pub fn pixels(self) -> usize {
        match self {
            DisplayWidth::W64 => 64,
            DisplayWidth::W128 => 128,
            DisplayWidth::W256 => 256,
            DisplayWidth::W320 => 320,
            DisplayWidth::W512 => 512,
            DisplayWidth::W640 => 640,
            DisplayWidth::W800 => 800,
            DisplayWidth::W1024 => 1024,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

impl Default for DisplayWidth {
    fn default() -> Self {
        DisplayWidth::W320
    }
}

/// Display area height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayHeight {
    H64,
    H128,
    H256,
    H240,
    H480,
    H512,
    H600,
    H768,
    H1024,
}

impl DisplayHeight {
    /// Listed in the same order as the selector, 240 after 256.
    pub const ALL: [DisplayHeight; 9] = [
        DisplayHeight::H64,
        DisplayHeight::H128,
        DisplayHeight::H256,
        DisplayHeight::H240,
        DisplayHeight::H480,
        DisplayHeight::H512,
        DisplayHeight::H600,
        DisplayHeight::H768,
        DisplayHeight::H1024,
    ];

    pub fn pixels(self) -> usize {
        match self {
            DisplayHeight::H64 => 64,
            DisplayHeight::H128 => 128,
            DisplayHeight::H256 => 256,
            DisplayHeight::H240 => 240,
            DisplayHeight::H480 => 480,
            DisplayHeight::H512 => 512,
            DisplayHeight::H600 => 600,
            DisplayHeight::H768 => 768,
            DisplayHeight::H1024 => 1024,
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }
}

impl Default for DisplayHeight {
    fn default() -> Self {
        DisplayHeight::H240
    }
}

/// Named memory regions the display can be based at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseAddress {
    /// 0x10000000
    GlobalData,
    /// 0x10008000
    GlobalPointer,
    /// 0x10010000
    StaticData,
    /// 0x10040000
    Heap,
    /// 0xFFFF0000
    MemoryMap,
}

impl BaseAddress {
    pub const ALL: [BaseAddress; 5] = [
        BaseAddress::GlobalData,
        BaseAddress::GlobalPointer,
        BaseAddress::StaticData,
        BaseAddress::Heap,
        BaseAddress::MemoryMap,
    ];

    pub fn address(self) -> u32 {
        match self {
            BaseAddress::GlobalData => 0x1000_0000,
            BaseAddress::GlobalPointer => 0x1000_8000,
            BaseAddress::StaticData => 0x1001_0000,
            BaseAddress::Heap => 0x1004_0000,
            BaseAddress::MemoryMap => 0xFFFF_0000,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BaseAddress::GlobalData => "global data",
            BaseAddress::GlobalPointer => "gp",
            BaseAddress::StaticData => "static data",
            BaseAddress::Heap => "heap",
            BaseAddress::MemoryMap => "memory map",
        }
    }

    pub fn next(self) -> Self {
        cycle(&Self::ALL, self)
    }

    fn from_address(address: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.address() == address)
    }
}

impl Default for BaseAddress {
    fn default() -> Self {
        BaseAddress::MemoryMap
    }
}

impl fmt::Display for UnitSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

impl fmt::Display for DisplayWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

impl fmt::Display for DisplayHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

/// Selector label, e.g. `0x10010000 (static data)`.
impl fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x} ({})", self.address(), self.description())
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let i = all.iter().position(|&v| v == current).unwrap_or(0);
    all[(i + 1) % all.len()]
}

fn parse_pixels<T: Copy>(s: &str, all: &[T], pixels: impl Fn(T) -> usize, what: &str) -> Result<T, DisplayError> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| DisplayError::Settings(format!("invalid {}: {:?}", what, s)))?;
    all.iter()
        .copied()
        .find(|&v| pixels(v) == n)
        .ok_or_else(|| DisplayError::Settings(format!("unsupported {}: {}", what, n)))
}

impl FromStr for UnitSize {
    type Err = DisplayError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pixels(s, &Self::ALL, Self::pixels, "unit size")
    }
}

impl FromStr for DisplayWidth {
    type Err = DisplayError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pixels(s, &Self::ALL, Self::pixels, "display width")
    }
}

impl FromStr for DisplayHeight {
    type Err = DisplayError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_pixels(s, &Self::ALL, Self::pixels, "display height")
    }
}

/// Accepts a region name (`static`, `gp`, `mmio`, ...), a hex address of one
/// of the regions, or a full selector label whose first ten characters are
/// the hex address.
impl FromStr for BaseAddress {
    type Err = DisplayError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "global" | "data" | "global-data" => return Ok(BaseAddress::GlobalData),
            "gp" | "global-pointer" => return Ok(BaseAddress::GlobalPointer),
            "static" | "static-data" => return Ok(BaseAddress::StaticData),
            "heap" => return Ok(BaseAddress::Heap),
            "mmio" | "memory-map" => return Ok(BaseAddress::MemoryMap),
            _ => {}
        }
        let hex = s.get(..10.min(s.len())).unwrap_or(s);
        let digits = hex.trim_start_matches("0x").trim_start_matches("0X");
        let address = u32::from_str_radix(digits, 16)
            .map_err(|_| DisplayError::Settings(format!("invalid base address: {:?}", s)))?;
        Self::from_address(address)
            .ok_or_else(|| DisplayError::Settings(format!("unsupported base address: 0x{:08x}", address)))
    }
}

/// Parse an enumerated choice, substituting the default on failure.
pub fn parse_or_default<T>(s: &str) -> T
where
    T: FromStr<Err = DisplayError> + Default + fmt::Display,
{
    match s.parse() {
        Ok(v) => v,
        Err(e) => {
            let fallback = T::default();
            log::warn!("{}; using {}", e, fallback);
            fallback
        }
    }
}

/// Complete display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub unit_width: UnitSize,
    pub unit_height: UnitSize,
    pub display_width: DisplayWidth,
    pub display_height: DisplayHeight,
    pub base_address: BaseAddress,
    /// Displacement multiplier applied before the word division (1 = one
    /// word per cell, 4 = one byte per cell)
    pub stride: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            unit_width: UnitSize::default(),
            unit_height: UnitSize::default(),
            display_width: DisplayWidth::default(),
            display_height: DisplayHeight::default(),
            base_address: BaseAddress::default(),
            stride: 1,
        }
    }
}

/// A single selector change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    UnitWidth(UnitSize),
    UnitHeight(UnitSize),
    DisplayWidth(DisplayWidth),
    DisplayHeight(DisplayHeight),
    BaseAddress(BaseAddress),
    Stride(u32),
}

impl DisplayConfig {
    /// `(rows, columns)` = display size divided by unit size, rounded down.
    pub fn grid_dimensions(&self) -> (usize, usize) {
        (
            self.display_height.pixels() / self.unit_height.pixels(),
            self.display_width.pixels() / self.unit_width.pixels(),
        )
    }

    /// Copy of `self` with `change` applied. A zero stride becomes 1.
    pub fn with(mut self, change: ConfigChange) -> Self {
        match change {
            ConfigChange::UnitWidth(v) => self.unit_width = v,
            ConfigChange::UnitHeight(v) => self.unit_height = v,
            ConfigChange::DisplayWidth(v) => self.display_width = v,
            ConfigChange::DisplayHeight(v) => self.display_height = v,
            ConfigChange::BaseAddress(v) => self.base_address = v,
            ConfigChange::Stride(v) => self.stride = v.max(1),
        }
        self
    }

    /// One-line description for logs and window titles.
    pub fn summary(&self) -> String {
        let (rows, columns) = self.grid_dimensions();
        format!(
            "{}x{} px, unit {}x{}, {}x{} cells @ {}",
            self.display_width, self.display_height, self.unit_width, self.unit_height,
            columns, rows, self.base_address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DisplayConfig::default();
        assert_eq!(cfg.display_width.pixels(), 320);
        assert_eq!(cfg.display_height.pixels(), 240);
        assert_eq!(cfg.base_address.address(), 0xFFFF_0000);
        assert_eq!(cfg.stride, 1);
        assert_eq!(cfg.grid_dimensions(), (240, 320));
    }

    #[test]
    fn test_grid_dimensions_round_down() {
        let cfg = DisplayConfig::default()
            .with(ConfigChange::UnitWidth(UnitSize::X32))
            .with(ConfigChange::UnitHeight(UnitSize::X32));
        // 320/32 = 10, 240/32 = 7.5
        assert_eq!(cfg.grid_dimensions(), (7, 10));
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("16".parse::<UnitSize>().unwrap(), UnitSize::X16);
        assert_eq!("1024".parse::<DisplayWidth>().unwrap(), DisplayWidth::W1024);
        assert_eq!(" 480 ".parse::<DisplayHeight>().unwrap(), DisplayHeight::H480);
        assert!("3".parse::<UnitSize>().is_err());
        assert!("wide".parse::<DisplayWidth>().is_err());
    }

    #[test]
    fn test_parse_base_address() {
        assert_eq!("heap".parse::<BaseAddress>().unwrap(), BaseAddress::Heap);
        assert_eq!("0x10008000".parse::<BaseAddress>().unwrap(), BaseAddress::GlobalPointer);
        let label = BaseAddress::StaticData.to_string();
        assert_eq!(label, "0x10010000 (static data)");
        assert_eq!(label.parse::<BaseAddress>().unwrap(), BaseAddress::StaticData);
        assert!("0x12345678".parse::<BaseAddress>().is_err());
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default::<UnitSize>("8"), UnitSize::X8);
        assert_eq!(parse_or_default::<UnitSize>("7"), UnitSize::X1);
        assert_eq!(parse_or_default::<DisplayHeight>(""), DisplayHeight::H240);
        assert_eq!(parse_or_default::<BaseAddress>("nowhere"), BaseAddress::MemoryMap);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(UnitSize::X32.next(), UnitSize::X1);
        assert_eq!(DisplayHeight::H256.next(), DisplayHeight::H240);
        assert_eq!(BaseAddress::MemoryMap.next(), BaseAddress::GlobalData);
    }

    #[test]
    fn test_zero_stride_substituted() {
        let cfg = DisplayConfig::default().with(ConfigChange::Stride(0));
        assert_eq!(cfg.stride, 1);
    }
}
