//! Frame counting and match phases.
//!
//! `Scheduler` is a pure frame counter. A `GameScheduler` derives everything
//! time-dependent (phase, elixir rate, forced end) from that counter, so the
//! same frame always yields the same answers.

use serde::{Deserialize, Serialize};

use super::config::{ElixirRates, EngineConfig};

/// Monotonic frame counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheduler {
    fps: u32,
    frame: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self { fps, frame: 0 }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Advance by `frames`. The counter never decreases.
    pub fn step(&mut self, frames: u64) {
        self.frame = self
            .frame
            .checked_add(frames)
            .expect("frame counter overflow");
    }

    /// Current frame.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Elapsed simulated time in seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.frame as f64 / f64::from(self.fps)
    }
}

/// Phase of a match. Ordered: phases only ever advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    Normal,
    DoubleElixir,
    /// Sudden death: differing tower counts end the match.
    Overtime,
    Finished,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchPhase::Normal => "normal",
            MatchPhase::DoubleElixir => "double elixir",
            MatchPhase::Overtime => "overtime",
            MatchPhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Derives match rules from the frame counter.
///
/// Implementations must be pure functions of `scheduler.frame()`.
pub trait GameScheduler {
    /// Phase at the scheduler's current frame.
    fn phase(&self, scheduler: &Scheduler) -> MatchPhase;

    /// Elixir accrued per second at the current frame.
    fn elixir_rate(&self, scheduler: &Scheduler) -> f64;

    /// Whether the time limit has been reached.
    fn is_game_over(&self, scheduler: &Scheduler) -> bool {
        self.phase(scheduler) == MatchPhase::Finished
    }

    /// Whether sudden death rules apply.
    fn is_overtime(&self, scheduler: &Scheduler) -> bool {
        self.phase(scheduler) >= MatchPhase::Overtime
    }
}

/// Standard 1v1 schedule: normal, double elixir, overtime, forced end.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefaultScheduler {
    double_elixir_frame: u64,
    overtime_frame: u64,
    end_frame: u64,
    rates: ElixirRates,
}

impl DefaultScheduler {
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            double_elixir_frame: config.frames_for(config.timing.double_elixir_at),
            overtime_frame: config.frames_for(config.timing.overtime_at),
            end_frame: config.frames_for(config.timing.end_at),
            rates: config.elixir_rates,
        }
    }

    /// Frame at which `phase` begins.
    #[must_use]
    pub fn phase_start(&self, phase: MatchPhase) -> u64 {
        match phase {
            MatchPhase::Normal => 0,
            MatchPhase::DoubleElixir => self.double_elixir_frame,
            MatchPhase::Overtime => self.overtime_frame,
            MatchPhase::Finished => self.end_frame,
        }
    }
}

impl GameScheduler for DefaultScheduler {
    fn phase(&self, scheduler: &Scheduler) -> MatchPhase {
        let frame = scheduler.frame();
        if frame >= self.end_frame {
            MatchPhase::Finished
        } else if frame >= self.overtime_frame {
            MatchPhase::Overtime
        } else if frame >= self.double_elixir_frame {
            MatchPhase::DoubleElixir
        } else {
            MatchPhase::Normal
        }
    }

    fn elixir_rate(&self, scheduler: &Scheduler) -> f64 {
        match self.phase(scheduler) {
            MatchPhase::Normal => self.rates.normal,
            MatchPhase::DoubleElixir => self.rates.double,
            MatchPhase::Overtime => self.rates.overtime,
            MatchPhase::Finished => 0.0,
        }
    }
}
