//! Chaos Pattern - chaos-game point generation driven by background loops
//!
//! Core modules:
//! - `sim`: Point generation engine (points, history, terrain)
//! - `mode`: Session lifecycle states and command gating
//! - `session`: Controller that owns vertices, terrain and both loops
//! - `runner`: Background compute loop
//! - `refresh`: Fixed-interval redraw ticker
//! - `view`: Render collaborator boundary
//! - `settings`: Session configuration

pub mod mode;
pub mod refresh;
pub mod runner;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

pub use mode::{Command, Mode, ModeCell};
pub use session::SessionController;
pub use settings::{Settings, StartPosition};
pub use sim::{Point, Snapshot, Terrain, TerrainView};
pub use view::{NullView, PatternView};

/// Reference configuration constants
pub mod consts {
    /// Number of anchor vertices
    pub const NUM_VERTICES: usize = 3;
    /// Fraction of the distance covered per jump
    pub const JUMP_FRACTION: f64 = 0.5;
    /// Terrain updates per compute batch
    pub const BATCH_SIZE: usize = 25;
    /// Pause between compute batches (ms)
    pub const BATCH_INTERVAL_MS: u64 = 5;
    /// Redraw cadence (ms)
    pub const REFRESH_INTERVAL_MS: u64 = 25;
    /// Default cap on retained history points
    pub const HISTORY_CAPACITY: usize = 1_000_000;
    /// Points per sealed history chunk
    pub const HISTORY_CHUNK_LEN: usize = 4096;
}

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("compute loop panicked")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, Error>;
