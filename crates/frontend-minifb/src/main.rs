//! Bitmap display frontend.
//!
//! Replays a store trace into simulated memory and shows the memory-mapped
//! display. Two execution modes:
//!
//! - **GUI mode** (default): minifb window sized to the display area. The
//!   trace is replayed a batch of stores per frame.
//! - **Headless mode** (`--headless`): replay the whole trace, then write the
//!   requested `--png` / `--mif` outputs and print a summary.
//!
//! GUI keys: U/I = unit width/height, W/H = display width/height,
//! B = base address, T = stride 1↔4, R = reset grid, S = screenshot,
//! M = MIF dump, Esc = quit. Any configuration key restarts the replay.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use bitmap_core::config::{parse_or_default, ConfigChange};
use bitmap_core::trace::{parse_trace, Store};
use bitmap_core::{settings, BitmapDisplay, DisplayConfig, Memory};
use log::{info, warn};
use minifb::{Key, KeyRepeat, Scale, ScaleMode, Window, WindowOptions};
use structopt::StructOpt;

const TITLE: &str = "Bitmap Display";

#[derive(Debug, StructOpt)]
#[structopt(name = "bitmap-display", about = "Memory-mapped bitmap display.")]
struct Opt {
    /// Store trace to replay (`sb|sh|sw <address> <value>` per line)
    #[structopt(parse(from_os_str))]
    trace: PathBuf,
    /// Unit width in pixels (1, 2, 4, 8, 16, 32)
    #[structopt(long)]
    unit_width: Option<String>,
    /// Unit height in pixels (1, 2, 4, 8, 16, 32)
    #[structopt(long)]
    unit_height: Option<String>,
    /// Display width in pixels
    #[structopt(long)]
    width: Option<String>,
    /// Display height in pixels
    #[structopt(long)]
    height: Option<String>,
    /// Base address: global, gp, static, heap, mmio, or one of their hex addresses
    #[structopt(long)]
    base: Option<String>,
    /// Address stride (4 maps one byte per cell)
    #[structopt(long)]
    stride: Option<u32>,
    /// Run without a window
    #[structopt(long)]
    headless: bool,
    /// Write a PNG screenshot after a headless run
    #[structopt(long, parse(from_os_str))]
    png: Option<PathBuf>,
    /// Write a MIF dump of the display window after a headless run
    #[structopt(long, parse(from_os_str))]
    mif: Option<PathBuf>,
    /// Settings file to load at start and save on exit
    /// (default: `<trace>.bmds`, loaded if present, never written)
    #[structopt(long, parse(from_os_str))]
    settings: Option<PathBuf>,
    /// Stores replayed per frame in GUI mode
    #[structopt(long, default_value = "64")]
    stores_per_frame: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let text = fs::read_to_string(&opt.trace)
        .with_context(|| format!("reading trace {}", opt.trace.display()))?;
    let stores = parse_trace(&text)?;
    info!("{} stores loaded from {}", stores.len(), opt.trace.display());

    let config = initial_config(&opt);
    let mut memory = Memory::new();
    let mut display = BitmapDisplay::new(config);
    display.connect(&mut memory);

    if opt.headless {
        run_headless(&opt, &mut display, &mut memory, &stores)?;
    } else {
        run_gui(&opt, &mut display, &mut memory, &stores)?;
    }

    if let Some(ref path) = opt.settings {
        settings::save_to_file(display.config(), path)?;
    }
    Ok(())
}

/// Settings file (if any), then command-line overrides.
fn initial_config(opt: &Opt) -> DisplayConfig {
    let path = match opt.settings {
        Some(ref p) => p.clone(),
        None => PathBuf::from(settings::settings_path(&opt.trace.to_string_lossy())),
    };
    let mut config = if path.exists() {
        settings::load_from_file(&path).unwrap_or_else(|e| {
            warn!("{}: {}; using defaults", path.display(), e);
            DisplayConfig::default()
        })
    } else {
        DisplayConfig::default()
    };
    if let Some(ref s) = opt.unit_width {
        config = config.with(ConfigChange::UnitWidth(parse_or_default(s)));
    }
    if let Some(ref s) = opt.unit_height {
        config = config.with(ConfigChange::UnitHeight(parse_or_default(s)));
    }
    if let Some(ref s) = opt.width {
        config = config.with(ConfigChange::DisplayWidth(parse_or_default(s)));
    }
    if let Some(ref s) = opt.height {
        config = config.with(ConfigChange::DisplayHeight(parse_or_default(s)));
    }
    if let Some(ref s) = opt.base {
        config = config.with(ConfigChange::BaseAddress(parse_or_default(s)));
    }
    if let Some(stride) = opt.stride {
        config = config.with(ConfigChange::Stride(stride));
    }
    config
}

/// Run one store through memory and, if observed, the display.
fn replay_one(display: &mut BitmapDisplay, memory: &mut Memory, store: &Store) {
    if let Some(event) = memory.store(store.address, store.value, store.width) {
        display.on_write(&event);
    }
}

// ─── Headless Mode ──────────────────────────────────────────────────────────

fn run_headless(opt: &Opt, display: &mut BitmapDisplay, memory: &mut Memory, stores: &[Store]) -> Result<()> {
    for store in stores {
        replay_one(display, memory, store);
    }
    if let Some(ref path) = opt.png {
        display.save_screenshot(path)?;
    }
    if let Some(ref path) = opt.mif {
        display.save_dump(memory, path)?;
    }
    println!(
        "{} rows x {} columns, {} stores, {} observed, {} cells written, {} painted",
        display.rows(),
        display.columns(),
        stores.len(),
        memory.notify_count,
        display.cells_written,
        display.grid().painted()
    );
    Ok(())
}

// ─── GUI Mode ───────────────────────────────────────────────────────────────

fn open_window(width: usize, height: usize) -> Result<Window> {
    let mut window = Window::new(
        TITLE,
        width,
        height,
        WindowOptions {
            scale: Scale::X1,
            scale_mode: ScaleMode::AspectRatioStretch,
            resize: true,
            ..Default::default()
        },
    )
    .map_err(|e| anyhow!("failed to create window: {}", e))?;
    window.set_target_fps(60);
    Ok(window)
}

/// Configuration change bound to a key press this frame, if any.
fn key_change(window: &Window, config: &DisplayConfig) -> Option<ConfigChange> {
    let pressed = |k: Key| window.is_key_pressed(k, KeyRepeat::No);
    if pressed(Key::U) {
        Some(ConfigChange::UnitWidth(config.unit_width.next()))
    } else if pressed(Key::I) {
        Some(ConfigChange::UnitHeight(config.unit_height.next()))
    } else if pressed(Key::W) {
        Some(ConfigChange::DisplayWidth(config.display_width.next()))
    } else if pressed(Key::H) {
        Some(ConfigChange::DisplayHeight(config.display_height.next()))
    } else if pressed(Key::B) {
        Some(ConfigChange::BaseAddress(config.base_address.next()))
    } else if pressed(Key::T) {
        Some(ConfigChange::Stride(if config.stride == 1 { 4 } else { 1 }))
    } else {
        None
    }
}

fn run_gui(opt: &Opt, display: &mut BitmapDisplay, memory: &mut Memory, stores: &[Store]) -> Result<()> {
    let (mut width, mut height) = display.area();
    let mut window = open_window(width, height)?;
    let mut buf = display.framebuffer_u32();
    let mut next = 0usize;
    let mut screenshot_n = 0u32;
    let mut mif_n = 0u32;
    let mut title_stale = true;
    let batch = opt.stores_per_frame.max(1);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if let Some(change) = key_change(&window, display.config()) {
            display.apply(change, memory);
            memory.clear();
            next = 0;
            title_stale = true;
            if display.area() != (width, height) {
                let (w, h) = display.area();
                width = w;
                height = h;
                window = open_window(width, height)?;
            }
        }

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            display.reset();
        }

        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            let f = format!("screenshot_{:04}.png", screenshot_n);
            match display.save_screenshot(Path::new(&f)) {
                Ok(()) => screenshot_n += 1,
                Err(e) => warn!("screenshot error: {}", e),
            }
        }

        if window.is_key_pressed(Key::M, KeyRepeat::No) {
            let f = format!("display_{:04}.mif", mif_n);
            match display.save_dump(memory, Path::new(&f)) {
                Ok(()) => mif_n += 1,
                Err(e) => warn!("MIF dump error: {}", e),
            }
        }

        let end = (next + batch).min(stores.len());
        for store in &stores[next..end] {
            replay_one(display, memory, store);
        }
        if end == stores.len() && next < end {
            title_stale = true;
        }
        next = end;

        if display.take_dirty() {
            buf = display.framebuffer_u32();
        }
        window
            .update_with_buffer(&buf, width, height)
            .map_err(|e| anyhow!("window update failed: {}", e))?;

        if title_stale {
            window.set_title(&format!(
                "{} - {} [{}/{} stores]",
                TITLE,
                display.config().summary(),
                next,
                stores.len()
            ));
            title_stale = false;
        }
    }
    Ok(())
}
