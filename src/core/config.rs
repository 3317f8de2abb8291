//! Engine configuration types.
//!
//! Callers configure a match at construction by providing:
//! - `MatchTiming`: when each match phase starts, in seconds
//! - `ElixirRates`: elixir accrual per second for each phase
//! - `EngineConfig`: arena size, frame rate, economy and timing combined
//!
//! Everything time-based is converted to frames with `EngineConfig::fps`.

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Smallest arena that fits both tower rows and the river.
pub const MIN_ARENA_WIDTH: u32 = 10;
pub const MIN_ARENA_HEIGHT: u32 = 16;

/// Phase boundaries of a match, in seconds of simulated time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTiming {
    /// Double elixir begins.
    pub double_elixir_at: u32,
    /// Overtime (sudden death) begins.
    pub overtime_at: u32,
    /// The match is forced to end.
    pub end_at: u32,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            double_elixir_at: 120,
            overtime_at: 180,
            end_at: 240,
        }
    }
}

/// Elixir accrued per second of simulated time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElixirRates {
    pub normal: f64,
    pub double: f64,
    pub overtime: f64,
}

impl Default for ElixirRates {
    fn default() -> Self {
        Self {
            normal: 1.0 / 2.8,
            double: 2.0 / 2.8,
            overtime: 2.0 / 2.8,
        }
    }
}

/// Complete engine configuration.
///
/// ## Example
///
/// ```
/// use arena_sim::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_fps(20)
///     .with_elixir_cap(None);
///
/// assert_eq!(config.width, 18);
/// assert_eq!(config.frames_for(2), 40);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Arena width in cells.
    pub width: u32,

    /// Arena height in cells.
    pub height: u32,

    /// Output size handed to renderers.
    pub resolution: (u32, u32),

    /// Simulated frames per second.
    pub fps: u32,

    /// Elixir each player starts (and resets) with.
    pub starting_elixir: f64,

    /// Upper bound on elixir. `None` accrues without limit.
    pub elixir_cap: Option<f64>,

    pub elixir_rates: ElixirRates,

    pub timing: MatchTiming,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 18,
            height: 32,
            resolution: (128, 128),
            fps: 30,
            starting_elixir: 5.0,
            elixir_cap: Some(10.0),
            elixir_rates: ElixirRates::default(),
            timing: MatchTiming::default(),
        }
    }
}

impl EngineConfig {
    /// Set the arena size in cells.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: (u32, u32)) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    #[must_use]
    pub fn with_starting_elixir(mut self, elixir: f64) -> Self {
        self.starting_elixir = elixir;
        self
    }

    #[must_use]
    pub fn with_elixir_cap(mut self, cap: Option<f64>) -> Self {
        self.elixir_cap = cap;
        self
    }

    #[must_use]
    pub fn with_elixir_rates(mut self, rates: ElixirRates) -> Self {
        self.elixir_rates = rates;
        self
    }

    #[must_use]
    pub fn with_timing(mut self, timing: MatchTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Number of frames in `seconds` of simulated time.
    #[must_use]
    pub fn frames_for(&self, seconds: u32) -> u64 {
        u64::from(self.fps) * u64::from(seconds)
    }

    /// Check that the configuration describes a playable match.
    pub fn validate(&self) -> Result<()> {
        if self.width < MIN_ARENA_WIDTH || self.height < MIN_ARENA_HEIGHT {
            return Err(EngineError::InvalidConfig(format!(
                "arena must be at least {}x{}, got {}x{}",
                MIN_ARENA_WIDTH, MIN_ARENA_HEIGHT, self.width, self.height
            )));
        }
        if self.height % 2 != 0 {
            return Err(EngineError::InvalidConfig(format!(
                "arena height must be even, got {}",
                self.height
            )));
        }
        if self.fps == 0 {
            return Err(EngineError::InvalidConfig("fps must be positive".into()));
        }
        if !(self.starting_elixir.is_finite() && self.starting_elixir >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "starting elixir must be non-negative, got {}",
                self.starting_elixir
            )));
        }
        if let Some(cap) = self.elixir_cap {
            if !(cap.is_finite() && cap >= self.starting_elixir) {
                return Err(EngineError::InvalidConfig(format!(
                    "elixir cap {} is below starting elixir {}",
                    cap, self.starting_elixir
                )));
            }
        }
        let rates = self.elixir_rates;
        if [rates.normal, rates.double, rates.overtime]
            .iter()
            .any(|r| !(r.is_finite() && *r >= 0.0))
        {
            return Err(EngineError::InvalidConfig(
                "elixir rates must be non-negative".into(),
            ));
        }
        let t = self.timing;
        if !(t.double_elixir_at <= t.overtime_at && t.overtime_at <= t.end_at) {
            return Err(EngineError::InvalidConfig(format!(
                "phase boundaries must be ordered, got {}/{}/{}",
                t.double_elixir_at, t.overtime_at, t.end_at
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.width, 18);
        assert_eq!(config.height, 32);
        assert_eq!(config.fps, 30);
        assert_eq!(config.starting_elixir, 5.0);
        assert_eq!(config.elixir_cap, Some(10.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .with_size(10, 20)
            .with_resolution((64, 64))
            .with_fps(10)
            .with_starting_elixir(7.0);

        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.resolution, (64, 64));
        assert_eq!(config.frames_for(120), 1200);
        assert_eq!(config.starting_elixir, 7.0);
    }

    #[test]
    fn test_rejects_small_arena() {
        let err = EngineConfig::default().with_size(4, 4).validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert!(EngineConfig::default().with_fps(0).validate().is_err());
    }

    #[test]
    fn test_rejects_cap_below_start() {
        let config = EngineConfig::default()
            .with_starting_elixir(5.0)
            .with_elixir_cap(Some(3.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_timing() {
        let config = EngineConfig::default().with_timing(MatchTiming {
            double_elixir_at: 200,
            overtime_at: 180,
            end_at: 240,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::default().with_elixir_cap(None);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
