//! Session controller
//!
//! Owns the vertex set, the terrain and the mode, and drives the compute loop
//! and refresh ticker. Commands arriving in a mode that does not accept them
//! are ignored and report `false`.
//!
//! | Mode     | Accepts                          |
//! |----------|----------------------------------|
//! | Building | add_vertex, build                |
//! | Ready    | add_vertex, play, build          |
//! | Jumping  | pause, build                     |
//! | Paused   | play, reset, build               |

use std::sync::Arc;

use crate::mode::{Command, Mode, ModeCell};
use crate::refresh::RefreshTicker;
use crate::runner::ComputeLoop;
use crate::settings::Settings;
use crate::sim::{Point, Snapshot, Terrain, TerrainView};
use crate::view::PatternView;
use crate::Result;

pub struct SessionController {
    settings: Settings,
    view: Arc<dyn PatternView>,
    mode: Arc<ModeCell>,
    vertices: Vec<Point>,
    /// Held here while no compute loop owns it
    terrain: Option<Terrain>,
    terrain_view: Option<TerrainView>,
    compute: Option<ComputeLoop>,
    ticker: Option<RefreshTicker>,
}

impl SessionController {
    /// Start a session in `Building` with no vertices
    pub fn new(settings: Settings, view: Arc<dyn PatternView>) -> Result<Self> {
        settings.validate()?;
        let session = Self {
            settings,
            view,
            mode: Arc::new(ModeCell::new(Mode::Building)),
            vertices: Vec::new(),
            terrain: None,
            terrain_view: None,
            compute: None,
            ticker: None,
        };
        session.view.set_vertices(&[]);
        session.view.set_terrain(None);
        session.view.set_mode(Mode::Building);
        log::info!(
            "Session started: place {} vertices to begin",
            session.settings.vertex_count
        );
        Ok(session)
    }

    pub fn mode(&self) -> Mode {
        self.mode.get()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Placed vertices, oldest first
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn has_terrain(&self) -> bool {
        self.terrain_view.is_some()
    }

    pub fn terrain_view(&self) -> Option<TerrainView> {
        self.terrain_view.clone()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.terrain_view.as_ref().map(TerrainView::snapshot)
    }

    /// Commands a menu should currently offer
    pub fn available_commands(&self) -> Vec<Command> {
        self.mode().available_commands()
    }

    /// Dispatch a menu command
    pub fn handle(&mut self, command: Command) -> Result<bool> {
        log::debug!("Command: {}", command.as_str());
        match command {
            Command::Play => self.play(),
            Command::Pause => self.pause(),
            Command::Reset => Ok(self.reset()),
            Command::Build => self.build(),
        }
    }

    /// Pointer-down input at screen coordinates
    pub fn touch(&mut self, x: f64, y: f64) -> bool {
        self.add_vertex(Point::new(x, y))
    }

    /// Place a vertex; beyond the configured count the oldest one is dropped
    pub fn add_vertex(&mut self, point: Point) -> bool {
        let mode = self.mode();
        if !mode.accepts_vertices() {
            log::debug!("Ignoring vertex in {} mode", mode.as_str());
            return false;
        }
        if !point.x.is_finite() || !point.y.is_finite() {
            log::debug!("Ignoring non-finite vertex ({}, {})", point.x, point.y);
            return false;
        }

        self.vertices.push(point);
        let limit = self.settings.vertex_count;
        if self.vertices.len() > limit {
            let excess = self.vertices.len() - limit;
            self.vertices.drain(..excess);
            log::debug!("Evicted {} oldest vertex", excess);
        }
        if mode == Mode::Building && self.vertices.len() == limit {
            self.set_mode(Mode::Ready);
        }

        self.view.set_vertices(&self.vertices);
        self.view.request_redraw();
        true
    }

    /// Start or resume generation
    ///
    /// Builds the terrain on first play. A configuration error leaves the
    /// session in its previous mode with no loops running.
    pub fn play(&mut self) -> Result<bool> {
        let previous = self.mode();
        if !previous.accepts(Command::Play) {
            log::debug!("Ignoring play in {} mode", previous.as_str());
            return Ok(false);
        }

        let terrain = match self.terrain.take() {
            Some(terrain) => terrain,
            None => {
                let terrain = Terrain::from_settings(&self.vertices, &self.settings)?;
                self.terrain_view = Some(terrain.view());
                self.view.set_terrain(Some(terrain.view()));
                terrain
            }
        };

        self.set_mode(Mode::Jumping);
        let compute = ComputeLoop::spawn(
            terrain,
            Arc::clone(&self.mode),
            Arc::clone(&self.view),
            self.settings.batch_size,
            self.settings.batch_interval(),
        );
        match compute {
            Ok(compute) => self.compute = Some(compute),
            Err(e) => {
                log::error!("Failed to start compute loop: {}", e);
                self.drop_terrain();
                self.set_mode(previous);
                return Err(e);
            }
        }

        match RefreshTicker::spawn(Arc::clone(&self.view), self.settings.refresh_interval()) {
            Ok(ticker) => self.ticker = Some(ticker),
            Err(e) => {
                log::error!("Failed to start refresh ticker: {}", e);
                self.set_mode(previous);
                // Keep the spawn error; a join failure is already logged
                let _ = self.stop_loops();
                if previous == Mode::Ready {
                    self.drop_terrain();
                }
                return Err(e);
            }
        }
        Ok(true)
    }

    /// Stop generation, keeping the terrain
    pub fn pause(&mut self) -> Result<bool> {
        let mode = self.mode();
        if !mode.accepts(Command::Pause) {
            log::debug!("Ignoring pause in {} mode", mode.as_str());
            return Ok(false);
        }
        self.set_mode(Mode::Paused);
        self.stop_loops()?;
        Ok(true)
    }

    /// Clear the drawn pattern and the terrain's retained points
    ///
    /// Vertices, current position and generation count are kept, so the next
    /// play continues on a clean canvas.
    pub fn reset(&mut self) -> bool {
        let mode = self.mode();
        if !mode.accepts(Command::Reset) {
            log::debug!("Ignoring reset in {} mode", mode.as_str());
            return false;
        }
        if let Some(terrain) = self.terrain.as_mut() {
            terrain.discard_history();
        }
        self.view.clear_pattern();
        self.view.request_redraw();
        log::info!("Pattern reset");
        true
    }

    /// Stop everything, drop the terrain and start collecting vertices again
    pub fn build(&mut self) -> Result<bool> {
        self.set_mode(Mode::Building);
        let stopped = self.stop_loops();

        self.vertices.clear();
        self.drop_terrain();
        self.view.set_vertices(&[]);
        self.view.clear_pattern();
        self.view.request_redraw();
        log::info!("Building: place {} vertices", self.settings.vertex_count);

        stopped.map(|()| true)
    }

    fn set_mode(&self, mode: Mode) {
        let previous = self.mode.get();
        self.mode.set(mode);
        self.view.set_mode(mode);
        if previous != mode {
            log::info!("Mode {} -> {}", previous.as_str(), mode.as_str());
        }
    }

    fn drop_terrain(&mut self) {
        self.terrain = None;
        self.terrain_view = None;
        self.view.set_terrain(None);
    }

    /// Cancel the ticker and wait for the compute loop to hand the terrain back
    ///
    /// The mode must already be something other than `Jumping`.
    fn stop_loops(&mut self) -> Result<()> {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        let Some(compute) = self.compute.take() else {
            return Ok(());
        };
        match compute.join() {
            Ok(terrain) => {
                self.terrain = Some(terrain);
                Ok(())
            }
            Err(e) => {
                log::error!("Compute loop failed, terrain discarded: {}", e);
                self.drop_terrain();
                Err(e)
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if self.compute.is_some() || self.ticker.is_some() {
            self.mode.set(Mode::Paused);
            if let Err(e) = self.stop_loops() {
                log::warn!("Error stopping session loops: {}", e);
            }
        }
    }
}
