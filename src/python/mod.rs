//! Python bindings for the arena simulation engine.
//!
//! # Quick Start
//!
//! ```python
//! import arena_sim
//!
//! deck = ["knight", "archer", "giant", "minions",
//!         "musketeer", "valkyrie", "cannon", "barbarian"]
//! engine = arena_sim.GameEngine(deck, deck, seed=42)
//!
//! mask = engine.legal_actions(0)        # float64, (width, height, 4)
//! engine.apply(0, (9, 20, 0))
//! engine.step(30)
//! if engine.is_terminal():
//!     print(engine.terminal_value())    # 0, 1 or -1 for a draw
//! ```

use pyo3::prelude::*;

mod py_engine;

pub use py_engine::*;

/// arena_sim: a frame-stepped arena battle simulator for RL training.
#[pymodule]
fn arena_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGameEngine>()?;
    Ok(())
}
