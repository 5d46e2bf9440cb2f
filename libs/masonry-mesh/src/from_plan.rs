//! # Plan to Mesh Conversion
//!
//! Instantiates every record of a [`WallPlan`] through the block and
//! arch synthesizers, then applies the global coordinate warp.
//! Degenerate records are downgraded to logged skips so one bad block
//! never loses the wall.

use masonry_plan::WallPlan;

use crate::arch::{build_arch, build_keystone};
use crate::block::build_block;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::warp::apply_warp;

/// Converts a wall plan into a polygon mesh.
pub fn plan_to_mesh(plan: &WallPlan) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    let mut skipped = 0usize;

    for block in &plan.blocks {
        if let Err(e) = build_block(&mut mesh, block, plan.subdivision) {
            tracing::warn!("skipping block at x={} z={}: {e}", block.x, block.z);
            skipped += 1;
        }
    }
    for arch in &plan.arches {
        if let Err(e) = build_arch(&mut mesh, arch, plan.radial, plan.sloped, plan.domain.top) {
            tracing::warn!("skipping arch at x={}: {e}", arch.center_x);
            skipped += 1;
        }
    }
    for keystone in &plan.keystones {
        if let Err(e) = build_keystone(&mut mesh, keystone) {
            tracing::warn!("skipping keystone at x={}: {e}", keystone.x);
            skipped += 1;
        }
    }
    if skipped > 0 {
        tracing::warn!("{skipped} degenerate records skipped");
    }

    apply_warp(&mut mesh, plan.radial, plan.sloped, plan.domain.top);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use masonry_plan::{ArchSpec, BlockSpec, WallDomain};
    use std::f64::consts::FRAC_PI_2;

    fn empty_plan() -> WallPlan {
        WallPlan {
            radial: false,
            sloped: false,
            domain: WallDomain::default(),
            subdivision: 0.0,
            blocks: Vec::new(),
            arches: Vec::new(),
            keystones: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_empty_plan_gives_empty_mesh() {
        let mesh = plan_to_mesh(&empty_plan()).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_blocks_and_arches_are_instantiated() {
        let mut plan = empty_plan();
        plan.blocks.push(BlockSpec::new(0.0, 2.0, 1.0, 0.5, 0.4));
        plan.arches.push(ArchSpec {
            center_x: 0.0,
            center_z: 3.0,
            inner_radius: 1.0,
            thickness: 0.2,
            depth: 0.4,
            angle_start: -FRAC_PI_2,
            angle_end: FRAC_PI_2,
            flip: false,
            bevel: 0.0,
            segment_width: 0.5,
            min_width: 0.1,
        });
        let mesh = plan_to_mesh(&plan).unwrap();
        assert!(mesh.point_count() > 8);
        assert!(mesh.validate());
    }

    #[test]
    fn test_degenerate_block_is_skipped_not_fatal() {
        let mut plan = empty_plan();
        plan.blocks.push(BlockSpec::new(0.0, 2.0, 0.0, 0.5, 0.4));
        plan.blocks.push(BlockSpec::new(0.0, 2.0, 1.0, 0.5, 0.4));
        let mesh = plan_to_mesh(&plan).unwrap();
        // The valid block still renders.
        assert_eq!(mesh.point_count(), 8);
    }
}
