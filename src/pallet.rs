//! Pallet-fork oscillation.
//!
//! The fork swings on a sinusoid locked to the escapement period. It is a
//! pure function of the escapement's time and has no effect on the train.

use crate::escapement::EscapementState;
use crate::float_types::{FRAC_PI_2, Real, TAU};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PalletConfig {
    /// Peak deflection either side of rest, radians
    pub swing_amplitude: Real,
    /// Phase of the swing at the start of a cycle, radians
    pub phase_offset: Real,
    /// Angle the fork sits at with no swing; the fork model points along +X
    pub rest_angle: Real,
}

impl Default for PalletConfig {
    fn default() -> Self {
        Self {
            swing_amplitude: (6.0 as Real).to_radians(),
            phase_offset: 0.0,
            rest_angle: -FRAC_PI_2,
        }
    }
}

impl PalletConfig {
    /// Deflection from rest at `elapsed` seconds into a cycle of `period`.
    pub fn swing(&self, elapsed: Real, period: Real) -> Real {
        let cycle_progress = (elapsed % period) / period;
        self.swing_amplitude * (cycle_progress * TAU + self.phase_offset).sin()
    }

    /// Absolute fork angle for the escapement's current time.
    pub fn angle(&self, escapement: &EscapementState) -> Real {
        self.rest_angle + self.swing(escapement.elapsed(), escapement.period())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swing_peaks_a_quarter_period_in() {
        let pallet = PalletConfig {
            swing_amplitude: 0.1,
            phase_offset: 0.0,
            rest_angle: 0.0,
        };
        assert!(pallet.swing(0.0, 2.0).abs() < 1e-12);
        assert!((pallet.swing(0.5, 2.0) - 0.1).abs() < 1e-12);
        assert!((pallet.swing(1.5, 2.0) + 0.1).abs() < 1e-12);
        // wraps with the period
        assert!((pallet.swing(2.5, 2.0) - 0.1).abs() < 1e-12);
    }
}
