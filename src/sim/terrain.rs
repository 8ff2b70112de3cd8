//! Chaos-game terrain
//!
//! Each step picks one vertex uniformly at random (with replacement) and moves
//! the current point `jump_fraction` of the way toward it. With three vertices
//! and a fraction of 0.5 the generated points settle onto a Sierpinski triangle.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::history::{History, Snapshot};
use super::point::Point;
use crate::settings::{Settings, StartPosition};
use crate::{Error, Result};

/// The point generation engine
///
/// Owned and mutated by a single thread at a time. Readers on other threads go
/// through a [`TerrainView`], which only ever sees whole, published points.
#[derive(Debug)]
pub struct Terrain {
    vertices: Arc<[Point]>,
    jump_fraction: f64,
    current: Point,
    seed: u64,
    rng: Pcg32,
    history: Arc<RwLock<History>>,
}

impl Terrain {
    /// Create a terrain with reference settings and the given fraction
    pub fn new(vertices: &[Point], jump_fraction: f64) -> Result<Self> {
        let settings = Settings {
            jump_fraction,
            ..Settings::default()
        };
        Self::from_settings(vertices, &settings)
    }

    pub fn from_settings(vertices: &[Point], settings: &Settings) -> Result<Self> {
        settings.validate()?;
        if vertices.len() != settings.vertex_count {
            return Err(Error::InvalidConfiguration(format!(
                "expected {} vertices, got {}",
                settings.vertex_count,
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(Error::InvalidConfiguration(
                "vertex coordinates must be finite".into(),
            ));
        }

        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = match settings.start {
            StartPosition::FirstVertex => vertices[0],
            StartPosition::Centroid => Point::centroid(vertices),
            StartPosition::Random => random_point_within(vertices, &mut rng),
        };

        log::debug!(
            "Terrain built: {} vertices, fraction {}, seed {}",
            vertices.len(),
            settings.jump_fraction,
            seed
        );

        Ok(Self {
            vertices: Arc::from(vertices),
            jump_fraction: settings.jump_fraction,
            current,
            seed,
            rng,
            history: Arc::new(RwLock::new(History::new(settings.history_capacity))),
        })
    }

    /// Jump toward a randomly chosen vertex and record the new point
    pub fn advance(&mut self) -> Point {
        let index = self.rng.random_range(0..self.vertices.len());
        let next = self.jump(index);
        self.write_history().push(next);
        next
    }

    /// Run `count` advances and publish them under a single write lock
    ///
    /// Returns the last generated point, or `None` when `count` is zero.
    pub fn advance_batch(&mut self, count: usize) -> Option<Point> {
        let batch: Vec<Point> = (0..count)
            .map(|_| {
                let index = self.rng.random_range(0..self.vertices.len());
                self.jump(index)
            })
            .collect();
        let mut history = self.write_history();
        for &point in &batch {
            history.push(point);
        }
        batch.last().copied()
    }

    /// Jump toward a specific vertex instead of a random one
    pub fn step_toward(&mut self, vertex_index: usize) -> Option<Point> {
        if vertex_index >= self.vertices.len() {
            return None;
        }
        let next = self.jump(vertex_index);
        self.write_history().push(next);
        Some(next)
    }

    fn jump(&mut self, vertex_index: usize) -> Point {
        let target = self.vertices[vertex_index];
        self.current = self.current.lerp(target, self.jump_fraction);
        self.current
    }

    /// Consistent copy of the points generated so far
    pub fn snapshot(&self) -> Snapshot {
        self.read_history().snapshot()
    }

    /// Read-only handle for other threads
    pub fn view(&self) -> TerrainView {
        TerrainView {
            vertices: Arc::clone(&self.vertices),
            history: Arc::clone(&self.history),
        }
    }

    /// Drop all retained points; position and generation count are kept
    pub fn discard_history(&mut self) {
        self.write_history().discard_all();
    }

    /// Points generated over the terrain's lifetime
    pub fn len(&self) -> usize {
        self.read_history().total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn jump_fraction(&self) -> f64 {
        self.jump_fraction
    }

    /// RNG seed, for reproducing a run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn read_history(&self) -> RwLockReadGuard<'_, History> {
        self.history.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_history(&self) -> RwLockWriteGuard<'_, History> {
        self.history.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Uniform random point inside the vertices' bounding box
fn random_point_within(vertices: &[Point], rng: &mut Pcg32) -> Point {
    let (mut min, mut max) = (vertices[0], vertices[0]);
    for v in vertices {
        min = Point::new(min.x.min(v.x), min.y.min(v.y));
        max = Point::new(max.x.max(v.x), max.y.max(v.y));
    }
    Point::new(
        min.x + (max.x - min.x) * rng.random::<f64>(),
        min.y + (max.y - min.y) * rng.random::<f64>(),
    )
}

/// Shared read-only access to a terrain's vertices and history
#[derive(Debug, Clone)]
pub struct TerrainView {
    vertices: Arc<[Point]>,
    history: Arc<RwLock<History>>,
}

impl TerrainView {
    pub fn snapshot(&self) -> Snapshot {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    /// Points generated so far, including evicted ones
    pub fn total(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .total()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(5.0, 10.0),
        ]
    }

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Settings::default()
        }
    }

    #[test]
    fn test_forced_steps_scenario() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(1)).unwrap();
        assert_eq!(terrain.current(), Point::new(0.0, 0.0));

        assert_eq!(terrain.step_toward(1), Some(Point::new(5.0, 0.0)));
        assert_eq!(terrain.step_toward(2), Some(Point::new(5.0, 5.0)));
        assert_eq!(terrain.len(), 2);
        assert_eq!(
            terrain.snapshot().to_vec(),
            vec![Point::new(5.0, 0.0), Point::new(5.0, 5.0)]
        );
    }

    #[test]
    fn test_step_toward_out_of_range() {
        let mut terrain = Terrain::new(&triangle(), 0.5).unwrap();
        assert_eq!(terrain.step_toward(3), None);
        assert!(terrain.is_empty());
    }

    #[test]
    fn test_rejects_wrong_vertex_count() {
        let two = &triangle()[..2];
        assert!(matches!(
            Terrain::new(two, 0.5),
            Err(Error::InvalidConfiguration(_))
        ));
        let mut four = triangle();
        four.push(Point::new(1.0, 1.0));
        assert!(matches!(
            Terrain::new(&four, 0.5),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_bad_fraction() {
        for f in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(
                matches!(Terrain::new(&triangle(), f), Err(Error::InvalidConfiguration(_))),
                "fraction {f} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_non_finite_vertex() {
        let mut verts = triangle();
        verts[2] = Point::new(f64::INFINITY, 0.0);
        assert!(Terrain::new(&verts, 0.5).is_err());
    }

    #[test]
    fn test_advance_grows_history_by_one() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(7)).unwrap();
        for expected in 1..=100 {
            let next = terrain.advance();
            assert_eq!(terrain.len(), expected);
            assert_eq!(terrain.current(), next);
            assert_eq!(terrain.snapshot().last(), Some(next));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Terrain::from_settings(&triangle(), &seeded(42)).unwrap();
        let mut b = Terrain::from_settings(&triangle(), &seeded(42)).unwrap();
        for _ in 0..50 {
            assert_eq!(a.advance(), b.advance());
        }
        a.advance_batch(25);
        b.advance_batch(25);
        assert_eq!(a.snapshot().to_vec(), b.snapshot().to_vec());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_advance_batch() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(3)).unwrap();
        assert_eq!(terrain.advance_batch(0), None);
        let last = terrain.advance_batch(25);
        assert_eq!(terrain.len(), 25);
        assert_eq!(last, Some(terrain.current()));
    }

    #[test]
    fn test_points_stay_inside_triangle_hull() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(9)).unwrap();
        terrain.advance_batch(2000);
        for p in terrain.snapshot().iter() {
            assert!(p.x >= 0.0 && p.x <= 10.0);
            assert!(p.y >= 0.0 && p.y <= 10.0);
        }
    }

    #[test]
    fn test_start_positions() {
        let centroid = Settings {
            start: StartPosition::Centroid,
            ..seeded(1)
        };
        let terrain = Terrain::from_settings(&triangle(), &centroid).unwrap();
        assert_eq!(terrain.current(), Point::centroid(&triangle()));

        let random = Settings {
            start: StartPosition::Random,
            ..seeded(1)
        };
        let terrain = Terrain::from_settings(&triangle(), &random).unwrap();
        let c = terrain.current();
        assert!((0.0..=10.0).contains(&c.x) && (0.0..=10.0).contains(&c.y));
    }

    #[test]
    fn test_discard_history_keeps_position() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(5)).unwrap();
        terrain.advance_batch(10);
        let pos = terrain.current();
        terrain.discard_history();
        assert_eq!(terrain.current(), pos);
        assert!(terrain.snapshot().is_empty());
        assert_eq!(terrain.len(), 10);
    }

    #[test]
    fn test_view_sees_published_points() {
        let mut terrain = Terrain::from_settings(&triangle(), &seeded(11)).unwrap();
        let view = terrain.view();
        assert_eq!(view.total(), 0);
        terrain.advance_batch(30);
        assert_eq!(view.total(), 30);
        assert_eq!(view.snapshot().to_vec(), terrain.snapshot().to_vec());
        assert_eq!(view.vertices(), terrain.vertices());
    }

    fn coord() -> impl Strategy<Value = f64> {
        -1000.0..1000.0f64
    }

    proptest! {
        #[test]
        fn prop_step_lands_fraction_of_the_way(
            verts in prop::collection::vec((coord(), coord()), 3),
            fraction in 0.01..0.99f64,
            picks in prop::collection::vec(0usize..3, 1..50),
        ) {
            let vertices: Vec<Point> = verts.into_iter().map(Point::from).collect();
            let settings = Settings {
                jump_fraction: fraction,
                seed: Some(0),
                ..Settings::default()
            };
            let mut terrain = Terrain::from_settings(&vertices, &settings).unwrap();

            for (n, pick) in picks.into_iter().enumerate() {
                let before = terrain.current();
                let target = vertices[pick];
                let next = terrain.step_toward(pick).unwrap();

                let whole = before.distance(target);
                let covered = before.distance(next);
                let rest = next.distance(target);
                let tol = 1e-9 * (1.0 + whole);
                prop_assert!((covered - fraction * whole).abs() <= tol);
                prop_assert!((covered + rest - whole).abs() <= tol);
                prop_assert_eq!(terrain.len(), n + 1);
            }
        }

        #[test]
        fn prop_advance_moves_toward_some_vertex(seed in any::<u64>(), steps in 1usize..100) {
            let vertices = triangle();
            let mut terrain = Terrain::from_settings(&vertices, &seeded(seed)).unwrap();
            for _ in 0..steps {
                let before = terrain.current();
                let next = terrain.advance();
                prop_assert!(vertices.iter().any(|&v| before.lerp(v, 0.5) == next));
            }
            prop_assert_eq!(terrain.len(), steps);
        }
    }
}
