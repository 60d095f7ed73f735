#[cfg(test)]
mod tests {
    use crate::face::{nearest_face, resolve, FACE_AXES};
    use glam::{Quat, Vec3};
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    const EPS: f32 = 0.1;

    /// One representative orientation per face: rotate the face axis onto
    /// world up.
    fn pose_showing(face: u8) -> Quat {
        let axis = FACE_AXES[(face - 1) as usize];
        Quat::from_rotation_arc(axis, Vec3::Z)
    }

    #[test]
    fn canonical_poses_map_to_expected_faces() {
        assert_eq!(resolve(Quat::IDENTITY, EPS), Some(1));
        assert_eq!(resolve(Quat::from_rotation_x(PI), EPS), Some(6));
        assert_eq!(resolve(Quat::from_rotation_x(FRAC_PI_2), EPS), Some(3));
        assert_eq!(resolve(Quat::from_rotation_x(-FRAC_PI_2), EPS), Some(4));
        assert_eq!(resolve(Quat::from_rotation_y(-FRAC_PI_2), EPS), Some(2));
        assert_eq!(resolve(Quat::from_rotation_y(FRAC_PI_2), EPS), Some(5));
    }

    #[test]
    fn every_face_is_reachable() {
        for face in 1u8..=6 {
            assert_eq!(resolve(pose_showing(face), EPS), Some(face));
        }
    }

    #[test]
    fn yaw_never_changes_the_face() {
        // All yaw-equivalent orientations of a flat pose (including the
        // negated quaternion, which is the same rotation) resolve alike.
        for face in 1u8..=6 {
            let base = pose_showing(face);
            for k in 0..8 {
                let yaw = Quat::from_rotation_z(TAU * k as f32 / 8.0);
                let q = yaw * base;
                assert_eq!(resolve(q, EPS), Some(face), "face {} yaw {}", face, k);
                assert_eq!(resolve(-q, EPS), Some(face), "face {} -q yaw {}", face, k);
            }
        }
    }

    #[test]
    fn tilt_within_epsilon_still_resolves() {
        let q = Quat::from_rotation_x(EPS * 0.5);
        assert_eq!(resolve(q, EPS), Some(1));
    }

    #[test]
    fn edge_rest_is_unsettled() {
        // 45 degrees between two faces: well outside any tolerance window.
        let q = Quat::from_rotation_x(PI / 4.0);
        assert_eq!(resolve(q, EPS), None);
        // Corner balance.
        let q = Quat::from_rotation_x(PI / 4.0) * Quat::from_rotation_y(PI / 4.0);
        assert_eq!(resolve(q, EPS), None);
    }

    #[test]
    fn tilt_just_past_epsilon_is_unsettled() {
        let q = Quat::from_rotation_x(EPS * 2.0);
        assert_eq!(resolve(q, EPS), None);
    }

    #[test]
    fn nearest_face_agrees_with_resolve_on_flat_poses() {
        for face in 1u8..=6 {
            assert_eq!(nearest_face(pose_showing(face)), face);
        }
    }

    #[test]
    fn nearest_face_picks_the_closer_side_of_an_edge() {
        // Tipped 35 degrees from face 1 toward face 3: still closest to 1.
        let q = Quat::from_rotation_x(0.61);
        assert_eq!(resolve(q, EPS), None);
        assert_eq!(nearest_face(q), 1);

        // Past 45 degrees the other face wins.
        let q = Quat::from_rotation_x(1.0);
        assert_eq!(nearest_face(q), 3);
    }

    #[test]
    fn opposite_faces_sum_to_seven() {
        for (i, axis) in FACE_AXES.iter().enumerate() {
            let face = i as u8 + 1;
            let opposite = FACE_AXES
                .iter()
                .position(|a| *a == -*axis)
                .map(|j| j as u8 + 1)
                .unwrap();
            assert_eq!(face + opposite, 7);
        }
    }
}
