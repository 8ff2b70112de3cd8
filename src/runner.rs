//! Background compute loop
//!
//! Owns the terrain while it runs. Each pass checks the shared mode, advances
//! the terrain by one batch, then parks for the batch interval. The mode is
//! checked once per batch, so at most one extra batch runs after a pause.
//! Joining hands the terrain back to the caller.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::mode::ModeCell;
use crate::sim::Terrain;
use crate::view::PatternView;
use crate::{Error, Result};

/// Handle to a running compute thread
#[derive(Debug)]
pub struct ComputeLoop {
    handle: JoinHandle<Terrain>,
}

impl ComputeLoop {
    /// Start generating on a dedicated thread
    ///
    /// The caller must have set the mode to `Jumping` already, otherwise the
    /// loop exits right away.
    pub fn spawn(
        terrain: Terrain,
        mode: Arc<ModeCell>,
        view: Arc<dyn PatternView>,
        batch_size: usize,
        batch_interval: Duration,
    ) -> Result<Self> {
        let handle = thread::Builder::new()
            .name("compute-loop".into())
            .spawn(move || run(terrain, &mode, view.as_ref(), batch_size, batch_interval))?;
        Ok(Self { handle })
    }

    /// Cut the current sleep short so the mode is re-checked
    pub fn wake(&self) {
        self.handle.thread().unpark();
    }

    /// Wait for the loop to exit and take the terrain back
    ///
    /// Only returns once the mode has left `Jumping`.
    pub fn join(self) -> Result<Terrain> {
        self.wake();
        self.handle.join().map_err(|_| Error::WorkerPanicked)
    }
}

fn run(
    mut terrain: Terrain,
    mode: &ModeCell,
    view: &dyn PatternView,
    batch_size: usize,
    batch_interval: Duration,
) -> Terrain {
    log::info!(
        "Compute loop started ({} per batch, {:?} interval)",
        batch_size,
        batch_interval
    );
    let mut batches = 0u64;
    while mode.is_jumping() {
        terrain.advance_batch(batch_size);
        batches += 1;
        // Early unpark is fine, the loop just re-checks the mode
        thread::park_timeout(batch_interval);
    }
    log::info!(
        "Compute loop stopped after {} batches ({} points total)",
        batches,
        terrain.len()
    );
    view.redraw_now();
    terrain
}
