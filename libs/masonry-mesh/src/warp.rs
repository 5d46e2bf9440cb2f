//! # Coordinate Warps
//!
//! Global warps applied once the whole wall is synthesized: the
//! sloped warp bends the vertical profile into a vault/dome, the
//! radial warp reinterprets the horizontal axis as an angle and the
//! vertical axis as a radius.

use std::f64::consts::PI;

use config::constants::MIN_SPAN;
use glam::DVec3;

use crate::mesh::Mesh;

/// Vault profile: planar `(y, z)` becomes
/// `((top + y)·cos(zπ/(2·top)), (top + y)·sin(zπ/(2·top)))`.
pub fn slope_point(p: DVec3, top: f64) -> DVec3 {
    let top = top.max(MIN_SPAN);
    let angle = p.z * PI / (2.0 * top);
    let arm = top + p.y;
    DVec3::new(p.x, arm * angle.cos(), arm * angle.sin())
}

/// Radial wrap: `(x, y, z)` becomes `(z·cos x, z·sin x, y)`.
pub fn radial_point(p: DVec3) -> DVec3 {
    DVec3::new(p.z * p.x.cos(), p.z * p.x.sin(), p.y)
}

/// Applies the configured warps to every point, slope first.
pub fn apply_warp(mesh: &mut Mesh, radial: bool, sloped: bool, top: f64) {
    if sloped {
        mesh.map_points(|p| slope_point(p, top));
    }
    if radial {
        mesh.map_points(radial_point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_wall_is_untouched() {
        let mut mesh = Mesh::new();
        mesh.add_point(DVec3::new(1.0, 2.0, 3.0));
        apply_warp(&mut mesh, false, false, 10.0);
        assert_eq!(mesh.point(0), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_radial_round_trip() {
        // Unwrapping a warped point via atan2/hypot recovers the
        // pre-warp angle and radius.
        let originals = [
            DVec3::new(0.3, 0.1, 4.0),
            DVec3::new(-1.2, -0.2, 7.5),
            DVec3::new(2.8, 0.0, 1.0),
        ];
        for original in originals {
            let mut mesh = Mesh::new();
            mesh.add_point(original);
            apply_warp(&mut mesh, true, false, 10.0);
            let p = mesh.point(0);
            assert_relative_eq!(p.y.atan2(p.x), original.x, epsilon = 1e-12);
            assert_relative_eq!(p.x.hypot(p.y), original.z, epsilon = 1e-12);
            assert_relative_eq!(p.z, original.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_slope_endpoints() {
        // The wall base swings to the horizontal arm, the top to the
        // vertical one.
        let base = slope_point(DVec3::new(0.0, 0.0, 0.0), 10.0);
        assert_relative_eq!(base.y, 10.0);
        assert_relative_eq!(base.z, 0.0);
        let top = slope_point(DVec3::new(0.0, 0.0, 10.0), 10.0);
        assert_relative_eq!(top.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(top.z, 10.0);
    }

    #[test]
    fn test_slope_preserves_arm_length() {
        for z in [0.0, 2.5, 5.0, 9.0] {
            let p = slope_point(DVec3::new(1.0, 0.25, z), 10.0);
            assert_relative_eq!(p.y.hypot(p.z), 10.25, epsilon = 1e-12);
        }
    }
}
