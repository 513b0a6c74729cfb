//! Eye-closure accumulator.
//!
//! Counts in twentieths of a second so that the +0.1 s / -0.05 s steps stay
//! exact: closed pulses add two units, open pulses remove one.

/// Units per second.
pub const UNITS_PER_SECOND: u32 = 20;
/// Saturation point: ten seconds of closure.
pub const EYE_CLOSURE_MAX_UNITS: u32 = 10 * UNITS_PER_SECOND;
/// Units gained per closed pulse.
pub const CLOSED_STEP_UNITS: u32 = 2;
/// Units lost per open pulse.
pub const OPEN_STEP_UNITS: u32 = 1;

/// What one pulse did to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeStep {
    /// Eyes closed, still below saturation or already reported.
    Closing,
    /// Saturation reached on this pulse; a countdown should start.
    Saturated,
    /// Eyes open (or exempt); any countdown this accumulator started ends.
    Recovering,
}

/// Accumulates eye closure toward the eye-closure countdown.
#[derive(Debug, Clone, Default)]
pub struct EyeClosureAccumulator {
    units: u32,
    fired: bool,
}

impl EyeClosureAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one pulse. `closing` is false while the eyes are open or the
    /// accumulator is exempt.
    pub fn pulse(&mut self, closing: bool) -> EyeStep {
        if !closing {
            self.units = self.units.saturating_sub(OPEN_STEP_UNITS);
            if self.units < EYE_CLOSURE_MAX_UNITS {
                self.fired = false;
            }
            return EyeStep::Recovering;
        }
        self.units = (self.units + CLOSED_STEP_UNITS).min(EYE_CLOSURE_MAX_UNITS);
        if self.units == EYE_CLOSURE_MAX_UNITS && !self.fired {
            self.fired = true;
            EyeStep::Saturated
        } else {
            EyeStep::Closing
        }
    }

    /// Accumulated closure in seconds.
    pub fn seconds(&self) -> f64 {
        f64::from(self.units) / f64::from(UNITS_PER_SECOND)
    }

    /// Accumulated closure in raw units.
    pub fn units(&self) -> u32 {
        self.units
    }

    /// Empty the accumulator.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
