//! Map a settled die's orientation to a face value.
//!
//! Face layout (body space, opposite faces sum to 7):
//! 1 on +Z, 6 on -Z, 2 on +X, 5 on -X, 3 on +Y, 4 on -Y.

use glam::{Quat, Vec3};

/// Body-space outward axis for each face value; `FACE_AXES[f - 1]` is the
/// axis of face `f`.
pub const FACE_AXES: [Vec3; 6] = [
    Vec3::Z,
    Vec3::X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::NEG_X,
    Vec3::NEG_Z,
];

/// Rotate world up into body space: the body-space direction currently
/// pointing at the ceiling.
fn up_in_body(orient: Quat) -> Vec3 {
    orient.conjugate() * Vec3::Z
}

/// Classify a rest orientation as a face value.
///
/// Returns `Some(face)` when the body-space up direction lies within
/// `epsilon` radians of one of the six face axes, `None` when the die is
/// balanced on an edge or corner. Depends only on which axis points up, so
/// all yaw-equivalent orientations of the same pose classify identically.
pub fn resolve(orient: Quat, epsilon: f32) -> Option<u8> {
    let up = up_in_body(orient);
    let (face, dot) = best_face(up);
    let angle = dot.clamp(-1.0, 1.0).acos();
    if angle <= epsilon {
        Some(face)
    } else {
        None
    }
}

/// Deterministic fallback: the face whose axis is closest to up, ties
/// broken toward the lower face value.
pub fn nearest_face(orient: Quat) -> u8 {
    best_face(up_in_body(orient)).0
}

fn best_face(up: Vec3) -> (u8, f32) {
    let mut best = 0usize;
    let mut best_dot = f32::NEG_INFINITY;
    for (i, axis) in FACE_AXES.iter().enumerate() {
        let d = up.dot(*axis);
        if d > best_dot {
            best_dot = d;
            best = i;
        }
    }
    (best as u8 + 1, best_dot)
}
