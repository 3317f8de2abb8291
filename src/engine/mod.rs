//! Match orchestration and the renderer-facing view.
//!
//! ## Key Types
//!
//! - `GameEngine`: Owns one match and advances it frame by frame
//! - `GameEngineBuilder`: Configure a match before it starts
//! - `FrameView` / `EntityView`: Read-only snapshot for renderers
//! - `Renderer`: Turns a snapshot into pixels or features

pub mod game_engine;
pub mod render;

pub use game_engine::{GameEngine, GameEngineBuilder};
pub use render::{EntityView, FrameView, OccupancyRenderer, Renderer};
