use serde::{Deserialize, Serialize};

use crate::signal::Point;

/// Distance within which the pointer counts as looking at the face.
pub const COLLISION_THRESHOLD_PX: f64 = 75.0;

/// Rendered size of a horror face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceSize {
    /// Normal appearance.
    Small,
    /// Mid jump scare.
    Enlarged,
}

impl FaceSize {
    /// Edge length in pixels.
    pub fn pixels(self) -> f64 {
        match self {
            Self::Small => 150.0,
            Self::Enlarged => 300.0,
        }
    }
}

/// Center of a face whose left edge sits at `left_x`, vertically centered
/// on a screen of height `screen_height`.
pub fn face_center(left_x: f64, screen_height: f64, size: FaceSize) -> Point {
    let half = size.pixels() / 2.0;
    let top = screen_height / 2.0 - half;
    Point::new(left_x + half, top + half)
}

/// Stateless pointer-versus-face test.
pub fn is_looking_at_face(pointer: Point, face_center: Point) -> bool {
    pointer.distance(face_center) <= COLLISION_THRESHOLD_PX
}
