//! Chaos Pattern entry point
//!
//! Headless demo: places a regular polygon of vertices, lets the compute loop
//! run for a moment and prints the pattern as an ASCII density plot.
//!
//! Usage: `chaos-pattern [settings.json] [run_ms]`

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chaos_pattern::{Mode, PatternView, Point, SessionController, Settings, Snapshot, TerrainView};

/// Canvas size in "screen" units
const CANVAS_W: f64 = 640.0;
const CANVAS_H: f64 = 480.0;
/// Plot size in characters
const PLOT_COLS: usize = 72;
const PLOT_ROWS: usize = 32;
const SHADES: &[u8] = b" .:-=+*#%@";

/// Counts redraw requests and logs mode changes
#[derive(Default)]
struct ConsoleView {
    redraws: AtomicUsize,
}

impl PatternView for ConsoleView {
    fn set_vertices(&self, vertices: &[Point]) {
        log::debug!("{} vertices placed", vertices.len());
    }

    fn set_terrain(&self, terrain: Option<TerrainView>) {
        if let Some(terrain) = terrain {
            log::debug!("Drawing from terrain with {} vertices", terrain.vertices().len());
        }
    }

    fn set_mode(&self, mode: Mode) {
        log::debug!("View mode: {}", mode.as_str());
    }

    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::Relaxed);
    }

    fn clear_pattern(&self) {}
}

/// Vertices of a regular polygon inscribed in the canvas, first one at the top
fn polygon(count: usize) -> Vec<Point> {
    let (cx, cy) = (CANVAS_W / 2.0, CANVAS_H / 2.0);
    let r = cx.min(cy) * 0.95;
    (0..count)
        .map(|i| {
            let theta =
                -std::f64::consts::FRAC_PI_2 + std::f64::consts::TAU * i as f64 / count as f64;
            Point::new(cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect()
}

fn plot(snapshot: &Snapshot) -> String {
    let mut counts = vec![0u32; PLOT_COLS * PLOT_ROWS];
    for p in snapshot.iter() {
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let col = (p.x / CANVAS_W * PLOT_COLS as f64) as usize;
        let row = (p.y / CANVAS_H * PLOT_ROWS as f64) as usize;
        if col < PLOT_COLS && row < PLOT_ROWS {
            counts[row * PLOT_COLS + col] += 1;
        }
    }
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;

    let mut out = String::with_capacity((PLOT_COLS + 1) * PLOT_ROWS);
    for row in counts.chunks(PLOT_COLS) {
        for &count in row {
            let level = if count == 0 {
                0
            } else {
                let scaled = (count as f64).ln_1p() / max.ln_1p();
                1 + (scaled * (SHADES.len() - 2) as f64).round() as usize
            };
            out.push(SHADES[level.min(SHADES.len() - 1)] as char);
        }
        out.push('\n');
    }
    out
}

fn run() -> chaos_pattern::Result<()> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let run_ms = args.next().and_then(|s| s.parse().ok()).unwrap_or(500);

    let view = Arc::new(ConsoleView::default());
    let mut session = SessionController::new(settings, view.clone())?;

    for vertex in polygon(session.settings().vertex_count) {
        session.add_vertex(vertex);
    }
    session.play()?;
    std::thread::sleep(Duration::from_millis(run_ms));
    session.pause()?;

    let snapshot = session.snapshot().unwrap_or_default();
    print!("{}", plot(&snapshot));
    println!(
        "{} points generated, {} retained, {} redraw requests",
        snapshot.total(),
        snapshot.len(),
        view.redraws.load(Ordering::Relaxed)
    );

    session.build()?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chaos Pattern (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by an embedding view
}
