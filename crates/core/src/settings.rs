//! Display settings file.
//!
//! Only the selector state is stored; grid contents are never persisted.
//!
//! ## File format
//!
//! ```text
//! +------------------+
//! | Magic "BMDS"     |  4 bytes
//! +------------------+
//! | Format version   |  u32 little-endian (currently 1)
//! +------------------+
//! | Payload          |  bincode-encoded DisplayConfig
//! +------------------+
//! ```

use std::path::Path;

use crate::config::DisplayConfig;
use crate::error::{DisplayError, Result};

/// Magic bytes identifying a settings file.
const MAGIC: &[u8; 4] = b"BMDS";
/// Current settings format version.
const FORMAT_VERSION: u32 = 1;

/// Serialize `config` with header.
pub fn to_bytes(config: &DisplayConfig) -> Result<Vec<u8>> {
    let payload = bincode::serialize(config)
        .map_err(|e| DisplayError::Settings(format!("serialize error: {}", e)))?;
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a settings blob, verifying magic and version.
pub fn from_bytes(data: &[u8]) -> Result<DisplayConfig> {
    if data.len() < 8 {
        return Err(DisplayError::Settings("file too small".into()));
    }
    if &data[0..4] != MAGIC {
        return Err(DisplayError::Settings("bad magic".into()));
    }
    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != FORMAT_VERSION {
        return Err(DisplayError::Settings(format!(
            "unsupported version {} (expected {})",
            version, FORMAT_VERSION
        )));
    }
    let mut config: DisplayConfig = bincode::deserialize(&data[8..])
        .map_err(|e| DisplayError::Settings(format!("deserialize error: {}", e)))?;
    config.stride = config.stride.max(1);
    Ok(config)
}

pub fn save_to_file(config: &DisplayConfig, path: &Path) -> Result<()> {
    std::fs::write(path, to_bytes(config)?)?;
    log::info!("settings saved to {}", path.display());
    Ok(())
}

pub fn load_from_file(path: &Path) -> Result<DisplayConfig> {
    let data = std::fs::read(path)?;
    from_bytes(&data)
}

/// Settings path next to a trace file: `demo.trace` → `demo.bmds`.
pub fn settings_path(trace_path: &str) -> String {
    let p = Path::new(trace_path);
    let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or("display");
    let dir = p.parent().unwrap_or(Path::new("."));
    dir.join(format!("{}.bmds", stem)).to_string_lossy().into_owned()
}
