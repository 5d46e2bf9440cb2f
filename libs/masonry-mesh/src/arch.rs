//! # Arch & Keystone Synthesizer
//!
//! Voussoir rings are built wedge by wedge in (angle, depth, radius)
//! space through the block synthesizer, then mapped to wall-local
//! Cartesian coordinates; the keystone is a diamond prism closing the
//! apex of a pointed arch.

use config::constants::{EPSILON, MIN_ANGULAR_STEP};
use glam::DVec3;
use masonry_plan::divider::subdivide;
use masonry_plan::{bevel_offsets, effective_radius, ArchSpec, BlockSpec, KeystoneSpec, Side};

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Appends one voussoir ring to the mesh.
///
/// The angular span is subdivided into wedges of roughly
/// `segment_width` arc length at the mean radius; each wedge is a
/// block in (angle, depth, radius) space whose points are then mapped
/// by `(θ, y, ρ) → (cx + ρ·sinθ / er, y, cz ± ρ·cosθ)`, where `er` is
/// the effective radius at the point's height (1 for flat walls).
/// Only the first and last wedge carry the inward bevel chamfer.
///
/// Returns the number of voussoirs emitted.
pub fn build_arch(
    mesh: &mut Mesh,
    arch: &ArchSpec,
    radial: bool,
    sloped: bool,
    top: f64,
) -> Result<usize, MeshError> {
    let span = arch.angle_end - arch.angle_start;
    if arch.thickness <= 0.0 || arch.depth <= 0.0 || span <= EPSILON {
        return Err(MeshError::degenerate(format!(
            "arch span must be positive: thickness {} span {span}",
            arch.thickness
        )));
    }
    let mean = arch.inner_radius + arch.thickness / 2.0;
    if mean <= 0.0 {
        return Err(MeshError::degenerate("arch mean radius must be positive"));
    }
    let step = (arch.segment_width.max(arch.min_width) / mean).max(MIN_ANGULAR_STEP);
    let cuts = subdivide(arch.angle_start, arch.angle_end, step);
    let bevel_angle = arch.bevel / mean;

    for (i, pair) in cuts.windows(2).enumerate() {
        let mut wedge = BlockSpec {
            x: (pair[0] + pair[1]) / 2.0,
            y: 0.0,
            z: mean,
            width: pair[1] - pair[0],
            height: arch.thickness,
            depth: arch.depth,
            corners: None,
        };
        if bevel_angle > 0.0 {
            let mut corners = [DVec3::ZERO; 8];
            let mut chamfered = false;
            if i == 0 {
                bevel_offsets(&mut corners, bevel_angle, Side::Left);
                chamfered = true;
            }
            if i + 2 == cuts.len() {
                bevel_offsets(&mut corners, bevel_angle, Side::Right);
                chamfered = true;
            }
            if chamfered {
                wedge.corners = Some(corners);
            }
        }
        let mut local = Mesh::with_capacity(8, 6);
        crate::block::build_block(&mut local, &wedge, 0.0)?;
        local.map_points(|p| {
            let (theta, rho) = (p.x, p.z);
            let dz = rho * theta.cos();
            let z = if arch.flip {
                arch.center_z - dz
            } else {
                arch.center_z + dz
            };
            let er = effective_radius(radial, sloped, top, z);
            DVec3::new(arch.center_x + rho * theta.sin() / er, p.y, z)
        });
        mesh.merge(&local);
    }
    Ok(cuts.len() - 1)
}

/// Appends the keystone closing a pointed arch.
///
/// An 8-point diamond prism: front/back rings of top, right, bottom
/// and left vertices, with the back outer vertex raised by the bevel.
/// `z_top` below `z_bottom` mirrors the prism for lower arches.
pub fn build_keystone(mesh: &mut Mesh, keystone: &KeystoneSpec) -> Result<(), MeshError> {
    let rise = keystone.z_top - keystone.z_bottom;
    if keystone.width <= 0.0 || keystone.depth <= 0.0 || rise.abs() <= EPSILON {
        return Err(MeshError::degenerate(format!(
            "keystone extents must be positive: {} x {}",
            keystone.width, rise
        )));
    }
    let dir = rise.signum();
    let half = keystone.width / 2.0;
    let mid = (keystone.z_bottom + keystone.z_top) / 2.0;
    let front = keystone.depth / 2.0;
    let back = -front;

    let base = mesh.point_count() as u32;
    for (y, raise) in [(front, 0.0), (back, keystone.bevel * dir)] {
        mesh.add_point(DVec3::new(keystone.x, y, keystone.z_top + raise));
        mesh.add_point(DVec3::new(keystone.x + half, y, mid));
        mesh.add_point(DVec3::new(keystone.x, y, keystone.z_bottom));
        mesh.add_point(DVec3::new(keystone.x - half, y, mid));
    }
    let [ft, fr, fb, fl] = [base, base + 1, base + 2, base + 3];
    let [bt, br, bb, bl] = [base + 4, base + 5, base + 6, base + 7];

    mesh.add_face(vec![fb, fl, ft, fr]);
    mesh.add_face(vec![bb, br, bt, bl]);
    mesh.add_face(vec![ft, fl, bl, bt]);
    mesh.add_face(vec![fl, fb, bb, bl]);
    mesh.add_face(vec![fb, fr, br, bb]);
    mesh.add_face(vec![fr, ft, bt, br]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn quarter_arch() -> ArchSpec {
        ArchSpec {
            center_x: 0.0,
            center_z: 5.0,
            inner_radius: 2.0,
            thickness: 0.4,
            depth: 0.5,
            angle_start: 0.0,
            angle_end: FRAC_PI_2,
            flip: false,
            bevel: 0.0,
            segment_width: 0.5,
            min_width: 0.1,
        }
    }

    #[test]
    fn test_arch_voussoir_counts() {
        let mut mesh = Mesh::new();
        let count = build_arch(&mut mesh, &quarter_arch(), false, false, 10.0).unwrap();
        // Quarter span at mean radius 2.2, target arc length 0.5.
        let expected = (FRAC_PI_2 / (0.5 / 2.2)).round() as usize;
        assert_eq!(count, expected);
        assert_eq!(mesh.point_count(), count * 8);
        assert_eq!(mesh.face_count(), count * 6);
        assert!(mesh.validate());
    }

    #[test]
    fn test_arch_points_lie_on_ring() {
        let mut mesh = Mesh::new();
        build_arch(&mut mesh, &quarter_arch(), false, false, 10.0).unwrap();
        for p in mesh.points() {
            let rho = (p.x * p.x + (p.z - 5.0) * (p.z - 5.0)).sqrt();
            assert!(rho >= 2.0 - 1e-9 && rho <= 2.4 + 1e-9);
        }
    }

    #[test]
    fn test_arch_flip_mirrors_below_center() {
        let mut up = Mesh::new();
        build_arch(&mut up, &quarter_arch(), false, false, 10.0).unwrap();
        let mut down = Mesh::new();
        let arch = ArchSpec {
            flip: true,
            ..quarter_arch()
        };
        build_arch(&mut down, &arch, false, false, 10.0).unwrap();
        for (a, b) in up.points().iter().zip(down.points()) {
            assert_relative_eq!(a.z - 5.0, 5.0 - b.z, epsilon = 1e-12);
            assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_arch_radial_compresses_horizontal() {
        let mut flat = Mesh::new();
        build_arch(&mut flat, &quarter_arch(), false, false, 10.0).unwrap();
        let mut radial = Mesh::new();
        build_arch(&mut radial, &quarter_arch(), true, false, 10.0).unwrap();
        for (a, b) in flat.points().iter().zip(radial.points()) {
            assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
            // Horizontal offsets shrink by the radius at the height.
            assert_relative_eq!(b.x, a.x / a.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_arch_bevel_on_end_wedges_only() {
        let arch = ArchSpec {
            bevel: 0.2,
            ..quarter_arch()
        };
        let mut plain = Mesh::new();
        build_arch(&mut plain, &quarter_arch(), false, false, 10.0).unwrap();
        let mut beveled = Mesh::new();
        let count = build_arch(&mut beveled, &arch, false, false, 10.0).unwrap();
        assert!(count >= 3);
        // Interior wedges are untouched by the chamfer.
        let moved: Vec<usize> = plain
            .points()
            .iter()
            .zip(beveled.points())
            .enumerate()
            .filter(|&(_, (a, b))| (*a - *b).length() > 1e-12)
            .map(|(i, _)| i / 8)
            .collect();
        assert!(!moved.is_empty());
        assert!(moved
            .iter()
            .all(|&w| w == 0 || w == count - 1));
    }

    #[test]
    fn test_arch_rejects_empty_span() {
        let mut mesh = Mesh::new();
        let arch = ArchSpec {
            angle_end: 0.0,
            ..quarter_arch()
        };
        assert!(build_arch(&mut mesh, &arch, false, false, 10.0).is_err());
    }

    #[test]
    fn test_keystone_prism_counts() {
        let mut mesh = Mesh::new();
        let keystone = KeystoneSpec {
            x: 0.0,
            z_bottom: 6.0,
            z_top: 6.5,
            width: 0.8,
            depth: 0.5,
            bevel: 0.1,
        };
        build_keystone(&mut mesh, &keystone).unwrap();
        assert_eq!(mesh.point_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.validate());
        // Back outer vertex raised by the bevel.
        assert_relative_eq!(mesh.point(4).z, 6.6);
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(min.x, -0.4);
        assert_relative_eq!(max.x, 0.4);
    }

    #[test]
    fn test_keystone_flipped_raises_downward() {
        let mut mesh = Mesh::new();
        let keystone = KeystoneSpec {
            x: 0.0,
            z_bottom: 3.0,
            z_top: 2.5,
            width: 0.8,
            depth: 0.5,
            bevel: 0.1,
        };
        build_keystone(&mut mesh, &keystone).unwrap();
        assert_relative_eq!(mesh.point(4).z, 2.4);
    }

    #[test]
    fn test_keystone_rejects_degenerate() {
        let mut mesh = Mesh::new();
        let keystone = KeystoneSpec {
            x: 0.0,
            z_bottom: 6.0,
            z_top: 6.0,
            width: 0.8,
            depth: 0.5,
            bevel: 0.0,
        };
        assert!(build_keystone(&mut mesh, &keystone).is_err());
    }
}
