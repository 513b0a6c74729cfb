use crate::signal::GazeSide;

/// Half-width of the dead band when the previous side was left or right.
pub const HYSTERESIS_PX: f64 = 60.0;
/// Half-width of the dead band when the previous side was center or unknown.
pub const CENTER_THRESHOLD_PX: f64 = 30.0;

/// Turns a continuous horizontal face position into a [`GazeSide`].
///
/// Leaving a side takes a wider swing than entering one, so a face hovering
/// near the midline does not flicker between sides.
#[derive(Debug, Clone, Default)]
pub struct SideClassifier {
    previous: GazeSide,
}

impl SideClassifier {
    /// Start from a known side.
    pub fn starting_at(side: GazeSide) -> Self {
        Self { previous: side }
    }

    /// Classify `x` relative to the screen center `center`.
    pub fn classify(&mut self, x: f64, center: f64) -> GazeSide {
        let next = match self.previous {
            GazeSide::Left => {
                if x > center + HYSTERESIS_PX {
                    GazeSide::Right
                } else if x > center - HYSTERESIS_PX {
                    GazeSide::Center
                } else {
                    GazeSide::Left
                }
            }
            GazeSide::Right => {
                if x < center - HYSTERESIS_PX {
                    GazeSide::Left
                } else if x < center + HYSTERESIS_PX {
                    GazeSide::Center
                } else {
                    GazeSide::Right
                }
            }
            GazeSide::Center | GazeSide::Unknown => {
                if x < center - CENTER_THRESHOLD_PX {
                    GazeSide::Left
                } else if x > center + CENTER_THRESHOLD_PX {
                    GazeSide::Right
                } else {
                    GazeSide::Center
                }
            }
        };
        self.previous = next;
        next
    }

    /// The tracker lost the face.
    pub fn lose_track(&mut self) -> GazeSide {
        self.previous = GazeSide::Unknown;
        self.previous
    }

    /// Overwrite the remembered side with an externally classified one.
    pub fn set(&mut self, side: GazeSide) {
        self.previous = side;
    }

    /// The last side produced.
    pub fn current(&self) -> GazeSide {
        self.previous
    }
}
