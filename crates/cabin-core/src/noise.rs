use crate::signal::NoiseLevel;

/// Watches for the player entering the noise red zone.
///
/// Edge-triggered: only the pulse that crosses into the red zone reports.
/// Staying loud does nothing further, and going quiet again never cancels
/// a countdown that was already started.
#[derive(Debug, Clone, Default)]
pub struct NoiseMonitor {
    in_red_zone: bool,
}

impl NoiseMonitor {
    /// Create a monitor that considers the room quiet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current level. Returns `true` on a rising edge.
    pub fn pulse(&mut self, noise: NoiseLevel) -> bool {
        let loud = noise.in_red_zone();
        let entered = loud && !self.in_red_zone;
        self.in_red_zone = loud;
        entered
    }

    /// Whether the last pulse was in the red zone.
    pub fn in_red_zone(&self) -> bool {
        self.in_red_zone
    }

    /// Forget the last level.
    pub fn reset(&mut self) {
        self.in_red_zone = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_rising_edges_only() {
        let mut monitor = NoiseMonitor::new();
        assert!(!monitor.pulse(NoiseLevel::new(30.0)));
        assert!(monitor.pulse(NoiseLevel::new(60.0)));
        assert!(!monitor.pulse(NoiseLevel::new(95.0)));
        assert!(!monitor.pulse(NoiseLevel::new(59.0)));
        assert!(!monitor.in_red_zone());
        assert!(monitor.pulse(NoiseLevel::new(61.0)));
    }
}
