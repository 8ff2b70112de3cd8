//! Point generation engine
//!
//! Pure chaos-game logic with no threads or platform dependencies:
//! - Seeded RNG only
//! - Append-only history with stable absolute indices
//! - Readers get consistent snapshots, never a partially written point

pub mod history;
pub mod point;
pub mod terrain;

pub use history::{History, Snapshot};
pub use point::Point;
pub use terrain::{Terrain, TerrainView};
