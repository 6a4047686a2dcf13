//! Escapement tick/hold waveform.
//!
//! Time is cut into cycles of `period` seconds. Each cycle starts with a tick
//! that carries the wheel forward by one tooth over `tick_duration` seconds;
//! for the rest of the cycle the wheel holds still:
//!
//! ```text
//! rotation = initial + completed_cycles * step + progress * step
//! progress = elapsed <= tick ? elapsed / tick : 1
//! ```

use crate::errors::TrainError;
use crate::float_types::{Real, TAU};

/// Sense in which the escapement wheel advances, seen from the dial side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Negative angles, the way a seconds hand turns
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub const fn sign(self) -> Real {
        match self {
            Direction::Clockwise => -1.0,
            Direction::CounterClockwise => 1.0,
        }
    }
}

/// Static escapement timing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EscapementConfig {
    pub tooth_count: usize,
    /// Seconds between two ticks
    pub period: Real,
    /// Seconds the wheel visibly moves at the start of each period
    pub tick_duration: Real,
    pub direction: Direction,
}

impl Default for EscapementConfig {
    /// 30 teeth ticking every two seconds: one revolution a minute.
    fn default() -> Self {
        Self {
            tooth_count: 30,
            period: 2.0,
            tick_duration: 0.4,
            direction: Direction::Clockwise,
        }
    }
}

impl EscapementConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.tooth_count == 0 {
            return Err(TrainError::InvalidTiming(
                "escapement wheel needs at least one tooth".to_string(),
            ));
        }
        if !(self.period.is_finite() && self.period > 0.0) {
            return Err(TrainError::InvalidTiming(format!(
                "period must be positive and finite, got {}",
                self.period
            )));
        }
        if !(self.tick_duration.is_finite() && self.tick_duration > 0.0) {
            return Err(TrainError::InvalidTiming(format!(
                "tick duration must be positive and finite, got {}",
                self.tick_duration
            )));
        }
        Ok(())
    }

    /// Signed angle of one tooth.
    pub fn angular_step_per_tooth(&self) -> Real {
        self.direction.sign() * TAU / self.tooth_count as Real
    }

    /// Tick duration actually used: a tick can never outlast its period.
    pub fn effective_tick(&self) -> Real {
        self.tick_duration.min(self.period)
    }
}

/// Running escapement: accumulated cycles plus time inside the current one.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapementState {
    config: EscapementConfig,
    step: Real,
    tick: Real,
    elapsed: Real,
    completed_cycles: u64,
    initial_rotation: Real,
    rotation: Real,
}

impl EscapementState {
    pub fn new(config: EscapementConfig) -> Result<Self, TrainError> {
        config.validate()?;
        if config.tick_duration >= config.period {
            tracing::debug!(
                period = config.period,
                tick_duration = config.tick_duration,
                "tick fills the whole period; escapement turns continuously"
            );
        }
        let step = config.angular_step_per_tooth();
        let tick = config.effective_tick();
        Ok(Self {
            config,
            step,
            tick,
            elapsed: 0.0,
            completed_cycles: 0,
            initial_rotation: 0.0,
            rotation: 0.0,
        })
    }

    /// Start from `rotation` instead of zero, e.g. to point a seconds hand at
    /// the current time.
    pub fn with_initial_rotation(mut self, rotation: Real) -> Self {
        self.set_initial_rotation(rotation);
        self
    }

    pub fn set_initial_rotation(&mut self, rotation: Real) {
        self.initial_rotation = rotation;
        self.rotation = self.rotation_for(self.completed_cycles, self.elapsed);
    }

    /// Move time forward by `dt` seconds and return the change in rotation.
    ///
    /// Negative or non-finite `dt` is ignored. Large steps simply jump ahead
    /// along the waveform.
    pub fn advance(&mut self, dt: Real) -> Real {
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!(dt, "ignoring invalid frame time step");
            return 0.0;
        }
        let period = self.config.period;
        let mut elapsed = self.elapsed + dt;
        if elapsed >= period {
            let rest = elapsed % period;
            let wraps = ((elapsed - rest) / period).round();
            // saturates for absurd steps instead of overflowing
            self.completed_cycles = self.completed_cycles.saturating_add(wraps as u64);
            elapsed = rest;
        }
        self.elapsed = elapsed;

        let previous = self.rotation;
        self.rotation = self.rotation_for(self.completed_cycles, self.elapsed);
        self.rotation - previous
    }

    /// Rotation after `total` seconds from the start, independent of how time
    /// was stepped.
    pub fn rotation_at(&self, total: Real) -> Real {
        let period = self.config.period;
        let cycles = (total / period).floor().max(0.0);
        let elapsed = (total - cycles * period).max(0.0);
        self.rotation_for(cycles as u64, elapsed)
    }

    fn rotation_for(&self, cycles: u64, elapsed: Real) -> Real {
        let progress = if elapsed <= self.tick {
            elapsed / self.tick
        } else {
            1.0
        };
        self.initial_rotation + cycles as Real * self.step + progress * self.step
    }

    pub fn config(&self) -> &EscapementConfig {
        &self.config
    }

    /// Seconds into the current cycle, in `[0, period)`.
    pub fn elapsed(&self) -> Real {
        self.elapsed
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    /// Total simulated time since the start.
    pub fn total_time(&self) -> Real {
        self.completed_cycles as Real * self.config.period + self.elapsed
    }

    pub fn period(&self) -> Real {
        self.config.period
    }

    pub fn angular_step_per_tooth(&self) -> Real {
        self.step
    }

    pub fn initial_rotation(&self) -> Real {
        self.initial_rotation
    }

    pub fn rotation(&self) -> Real {
        self.rotation
    }
}
