use glam::{Mat4, Vec4};

use crate::types::{Fov, Pose};

/// Asymmetric-frustum projection for a runtime field of view, mapping depth
/// to `[0, 1]` (near plane to 0, far plane to 1).
pub fn projection_matrix(fov: &Fov, near: f32, far: f32) -> Mat4 {
    let tan_left = fov.angle_left.tan();
    let tan_right = fov.angle_right.tan();
    let tan_up = fov.angle_up.tan();
    let tan_down = fov.angle_down.tan();

    let tan_width = tan_right - tan_left;
    let tan_height = tan_up - tan_down;

    let a = 2.0 / tan_width;
    let b = (tan_right + tan_left) / tan_width;
    let c = 2.0 / tan_height;
    let d = (tan_up + tan_down) / tan_height;
    let e = far / (near - far);
    let f = e * near;

    Mat4::from_cols(
        Vec4::new(a, 0.0, 0.0, 0.0),
        Vec4::new(0.0, c, 0.0, 0.0),
        Vec4::new(b, d, e, -1.0),
        Vec4::new(0.0, 0.0, f, 0.0),
    )
}

/// World-to-view transform: translate by the negated position, then rotate
/// by the inverse orientation.
pub fn view_matrix(pose: &Pose) -> Mat4 {
    Mat4::from_quat(pose.orientation.inverse()) * Mat4::from_translation(-pose.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_4;

    const EPS: f32 = 1e-4;

    fn symmetric_fov() -> Fov {
        Fov {
            angle_left: -FRAC_PI_4,
            angle_right: FRAC_PI_4,
            angle_up: FRAC_PI_4,
            angle_down: -FRAC_PI_4,
        }
    }

    fn ndc(m: Mat4, point: Vec3) -> Vec3 {
        let clip = m * point.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn test_projection_depth_range() {
        let m = projection_matrix(&symmetric_fov(), 0.05, 1000.0);
        assert!(ndc(m, Vec3::new(0.0, 0.0, -0.05)).z.abs() < EPS);
        assert!((ndc(m, Vec3::new(0.0, 0.0, -1000.0)).z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_projection_fov_edges() {
        let m = projection_matrix(&symmetric_fov(), 0.1, 100.0);
        // 45 degree half-angles put (1, 1, -1) on the top-right frustum edge
        let corner = ndc(m, Vec3::new(1.0, 1.0, -1.0));
        assert!((corner.x - 1.0).abs() < EPS);
        assert!((corner.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_projection_asymmetric_center() {
        let fov = Fov {
            angle_left: -0.9,
            angle_right: 0.7,
            angle_up: 0.8,
            angle_down: -0.6,
        };
        let m = projection_matrix(&fov, 0.05, 1000.0);
        let left_edge = ndc(m, Vec3::new((-0.9f32).tan(), 0.0, -1.0));
        let down_edge = ndc(m, Vec3::new(0.0, (-0.6f32).tan(), -1.0));
        assert!((left_edge.x + 1.0).abs() < EPS);
        assert!((down_edge.y + 1.0).abs() < EPS);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let pose = Pose {
            orientation: Quat::from_rotation_y(0.6),
            position: Vec3::new(0.3, 1.6, -2.0),
        };
        let m = view_matrix(&pose);
        assert!(m.transform_point3(pose.position).length() < EPS);

        let ahead = pose.position + pose.orientation * Vec3::NEG_Z;
        let local = m.transform_point3(ahead);
        assert!((local - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_view_matrix_is_inverse_of_pose() {
        let pose = Pose {
            orientation: Quat::from_euler(glam::EulerRot::YXZ, 0.4, -0.2, 0.1),
            position: Vec3::new(-1.0, 0.5, 2.0),
        };
        let world_from_view = Mat4::from_rotation_translation(pose.orientation, pose.position);
        let product = view_matrix(&pose) * world_from_view;
        assert!(product.abs_diff_eq(Mat4::IDENTITY, EPS));
    }
}
