//! Render collaborator boundary
//!
//! The session never draws anything itself. It tells a [`PatternView`] what
//! changed and when to redraw; the view reads points through the
//! [`TerrainView`] it was handed.

use crate::mode::Mode;
use crate::sim::{Point, TerrainView};

/// Receiver of display updates
///
/// `request_redraw` and `redraw_now` are called from the compute loop and the
/// refresh ticker threads and must not block them.
pub trait PatternView: Send + Sync {
    /// Vertices changed (placed, evicted or cleared)
    fn set_vertices(&self, vertices: &[Point]);

    /// New terrain to draw from, or `None` when it was dropped
    fn set_terrain(&self, terrain: Option<TerrainView>);

    /// Mode changed; menus and overlays follow it
    fn set_mode(&self, mode: Mode);

    /// Schedule a redraw from the latest snapshot
    fn request_redraw(&self);

    /// Forget any drawn pattern
    fn clear_pattern(&self);

    /// Redraw immediately, used once when the compute loop exits
    fn redraw_now(&self) {
        self.request_redraw();
    }
}

/// View that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl PatternView for NullView {
    fn set_vertices(&self, _vertices: &[Point]) {}
    fn set_terrain(&self, _terrain: Option<TerrainView>) {}
    fn set_mode(&self, _mode: Mode) {}
    fn request_redraw(&self) {}
    fn clear_pattern(&self) {}
}
