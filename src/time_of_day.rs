//! Wall-clock seeding of the hands.

use crate::float_types::Real;

/// Local time used once at startup to point the hands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeOfDay {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: Real,
}

impl TimeOfDay {
    pub const fn new(hours: u32, minutes: u32, seconds: Real) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    pub const fn midnight() -> Self {
        Self::new(0, 0, 0.0)
    }

    /// Current local time.
    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        use chrono::Timelike;

        let now = chrono::Local::now();
        // leap seconds report nanoseconds past 1e9
        let fraction = now.nanosecond().min(999_999_999) as Real / 1e9;
        Self::new(now.hour(), now.minute(), now.second() as Real + fraction)
    }
}

/// Which hand a train node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandKind {
    Seconds,
    Minutes,
    Hours,
}

impl HandKind {
    /// Rotation that points this hand at `time`.
    ///
    /// At zero rotation a hand points east (3 o'clock); positive angles turn
    /// counter-clockwise, so the dial reading runs the other way.
    pub fn seed_angle(self, time: &TimeOfDay) -> Real {
        let s = time.seconds;
        let m = time.minutes as Real + s / 60.0;
        let h = (time.hours % 12) as Real + m / 60.0;
        let degrees = match self {
            HandKind::Seconds => 90.0 - 6.0 * s,
            HandKind::Minutes => 90.0 - 6.0 * m,
            HandKind::Hours => 90.0 - 30.0 * h,
        };
        degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::FRAC_PI_2;

    #[test]
    fn hands_point_north_at_noon() {
        let noon = TimeOfDay::new(12, 0, 0.0);
        for hand in [HandKind::Seconds, HandKind::Minutes, HandKind::Hours] {
            assert!((hand.seed_angle(&noon) - FRAC_PI_2).abs() < 1e-12);
        }
    }

    #[test]
    fn quarter_past_three() {
        let t = TimeOfDay::new(3, 15, 0.0);
        assert!(HandKind::Minutes.seed_angle(&t).abs() < 1e-12);
        // hour hand has moved a quarter of the way to four
        let expected = (90.0 - 30.0 * 3.25 as Real).to_radians();
        assert!((HandKind::Hours.seed_angle(&t) - expected).abs() < 1e-12);
    }
}
