//! Engine bindings for Python.

use numpy::{PyArray1, PyArray2, PyArray3, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{EngineConfig, EngineError, Placement, PlayerId};
use crate::engine::{GameEngine, OccupancyRenderer};

fn to_py_err(error: EngineError) -> PyErr {
    PyValueError::new_err(error.to_string())
}

fn side(player: u8) -> PyResult<PlayerId> {
    PlayerId::from_index(usize::from(player))
        .ok_or_else(|| PyValueError::new_err(format!("player must be 0 or 1, got {}", player)))
}

/// Python wrapper for GameEngine.
#[pyclass(name = "GameEngine")]
pub struct PyGameEngine {
    inner: GameEngine,
}

#[pymethods]
impl PyGameEngine {
    #[new]
    #[pyo3(signature = (deck1, deck2, width=18, height=32, resolution=(128, 128), fps=30, seed=0, elixir_cap=Some(10.0)))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        deck1: Vec<String>,
        deck2: Vec<String>,
        width: u32,
        height: u32,
        resolution: (u32, u32),
        fps: u32,
        seed: u64,
        elixir_cap: Option<f64>,
    ) -> PyResult<Self> {
        let config = EngineConfig::default()
            .with_size(width, height)
            .with_resolution(resolution)
            .with_fps(fps)
            .with_elixir_cap(elixir_cap);
        let inner = GameEngine::new(deck1.as_slice(), deck2.as_slice(), config, seed).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn reset(&mut self) -> PyResult<()> {
        self.inner.reset().map_err(to_py_err)
    }

    /// Apply `(x, y, hand_index)` for `player`, or pass with `None`.
    #[pyo3(signature = (player, action=None))]
    fn apply(&mut self, player: u8, action: Option<(i32, i32, usize)>) -> PyResult<()> {
        let player = side(player)?;
        self.inner
            .apply(player, action.map(Placement::from))
            .map_err(to_py_err)
    }

    #[pyo3(signature = (frames=1))]
    fn step(&mut self, frames: u64) {
        self.inner.step(frames);
    }

    /// Legal action mask as float64 with shape `(width, height, 4)`.
    fn legal_actions<'py>(&self, py: Python<'py>, player: u8) -> PyResult<Bound<'py, PyArray3<f64>>> {
        let mask = self.inner.legal_actions(side(player)?);
        let (w, h, slots) = mask.shape();
        PyArray1::from_vec_bound(py, mask.to_f64())
            .reshape([w, h, slots])
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    /// Winning side, -1 for a draw, `None` while the match is running.
    fn terminal_value(&self) -> Option<i32> {
        self.inner.terminal_value().map(|result| result.value())
    }

    /// Occupancy grid with shape `(height, width)` from `player`'s side.
    fn make_image<'py>(&self, py: Python<'py>, player: u8) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let grid = self.inner.make_image(side(player)?, &mut OccupancyRenderer);
        let config = self.inner.config();
        PyArray1::from_vec_bound(py, grid)
            .reshape([config.height as usize, config.width as usize])
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Running entities as `(side, card, x, y, health, max_health)`.
    fn entities(&self) -> Vec<(usize, String, f64, f64, i32, i32)> {
        self.inner
            .entity_views()
            .into_iter()
            .map(|v| (v.side.index(), v.card, v.position.x, v.position.y, v.health, v.max_health))
            .collect()
    }

    fn elixir(&self, player: u8) -> PyResult<f64> {
        Ok(self.inner.player(side(player)?).elixir())
    }

    /// Card names in the visible hand slots.
    fn hand(&self, player: u8) -> PyResult<Vec<String>> {
        let hand = self.inner.player(side(player)?).hand();
        Ok(hand.slots().iter().map(|card| card.name.clone()).collect())
    }

    #[getter]
    fn frame(&self) -> u64 {
        self.inner.frame()
    }

    #[getter]
    fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    fn __repr__(&self) -> String {
        format!(
            "GameEngine(frame={}, phase={}, terminal={})",
            self.inner.frame(),
            self.inner.phase(),
            self.inner.is_terminal()
        )
    }
}
