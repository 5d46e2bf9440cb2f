//! # Masonry Plan
//!
//! Wall layout planning for the masonry generation pipeline.
//!
//! ## Architecture
//!
//! ```text
//! WallSpec → masonry-plan (WallPlan) → masonry-mesh (Mesh)
//! ```
//!
//! This crate decides *where stone goes*: it divides the wall into
//! rows around every opening, derives edge, wedge, arch, keystone and
//! side-stone records, and runs the optional merge/shelf/step passes.
//! All randomness lives here, behind a seeded per-call context; the
//! resulting [`WallPlan`] is plain data the mesh crate consumes
//! deterministically.
//!
//! ## Example
//!
//! ```rust
//! use masonry_plan::{plan, WallSpec};
//!
//! let plan = plan(&WallSpec::default());
//! assert!(!plan.blocks.is_empty());
//! ```

pub mod context;
pub mod divider;
pub mod features;
pub mod geometry;
pub mod opening;
pub mod row;
pub mod wall;

// Re-export public API
pub use context::{
    effective_radius, GenerationContext, OpeningSpec, Settings, ShelfSpec, StepSpec, WallDomain,
    WallSpec,
};
pub use geometry::{bevel_offsets, ArchSpec, BlockSpec, CornerOffsets, KeystoneSpec, WallPlan};
pub use opening::{ArchProfile, ArchShape, Opening, OpeningKind, Side, VerticalSide};
pub use row::{Row, Segment};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Plans the complete layout of one wall.
///
/// Clamps the configuration, expands openings, schedules rows, plans
/// and fills every row, runs the optional merge/shelf/step passes and
/// places all arches. Equal specs (seed included) produce identical
/// plans.
pub fn plan(spec: &WallSpec) -> WallPlan {
    let mut ctx = GenerationContext::new(spec);
    let openings = wall::expand_openings(&mut ctx, &spec.openings);
    let mut rows = wall::plan_rows(&mut ctx, &openings);
    tracing::debug!(
        rows = rows.len(),
        openings = openings.len() - 1,
        "wall schedule planned"
    );

    for row in &mut rows {
        row.plan_edges(&mut ctx, &openings);
        row.fill_blocks(&mut ctx);
    }
    if spec.merge_blocks {
        features::merge_rows(&ctx, &mut rows);
    }

    let mut blocks = Vec::new();
    for row in &mut rows {
        blocks.append(&mut row.edge_blocks);
        blocks.append(&mut row.fill_blocks);
    }
    if let Some(shelf) = &spec.shelf {
        features::shelf_blocks(&mut ctx, shelf, spec.shelf_on_back, &mut blocks);
    }
    if let Some(steps) = &spec.steps {
        features::step_blocks(
            &mut ctx,
            steps,
            spec.steps_leftward,
            spec.steps_only,
            spec.steps_on_back,
            &mut blocks,
        );
    }

    let mut arches = Vec::new();
    let mut keystones = Vec::new();
    for opening in &openings[1..] {
        let placement = wall::place_arches(&mut ctx, opening);
        arches.extend(placement.arches);
        keystones.extend(placement.keystones);
        blocks.extend(placement.side_stones);
    }
    tracing::debug!(
        blocks = blocks.len(),
        arches = arches.len(),
        "wall layout complete"
    );

    WallPlan {
        radial: spec.radial,
        sloped: spec.sloped,
        domain: ctx.domain,
        subdivision: ctx.settings.subdivision,
        blocks,
        arches,
        keystones,
        warnings: ctx.warnings,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_spec() -> WallSpec {
        WallSpec {
            domain: WallDomain {
                start: -10.0,
                end: 10.0,
                bottom: 0.0,
                top: 10.0,
            },
            settings: Settings {
                width: 1.0,
                height: 1.0,
                grout: 0.1,
                ..Settings::default()
            },
            seed: 17,
            ..WallSpec::default()
        }
    }

    #[test]
    fn test_no_opening_baseline_tiles_uniformly() {
        let plan = plan(&base_spec());
        assert!(plan.warnings.is_empty());
        assert!(plan.arches.is_empty());
        // Every block stays inside the wall bounds.
        for b in &plan.blocks {
            assert!(b.left() >= -10.0 - 1e-9);
            assert!(b.right() <= 10.0 + 1e-9);
            assert!(b.bottom() >= 0.0 - 1e-9);
            assert!(b.top() <= 10.0 + 1e-9);
        }
        // Zero variance: rows sit on a uniform schedule of height +
        // grout, covering the wall height within one joint.
        let mut bottoms: Vec<f64> = plan.blocks.iter().map(|b| b.bottom()).collect();
        bottoms.sort_by(|a, b| a.partial_cmp(b).unwrap());
        bottoms.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
        for pair in bottoms.windows(2) {
            assert!((pair[1] - pair[0] - 1.1).abs() < 1e-9);
        }
        let top = plan.blocks.iter().map(|b| b.top()).fold(0.0, f64::max);
        assert!(10.0 - top <= 1.1 + 1e-9);
    }

    #[test]
    fn test_scenario_opening_carved_out() {
        let mut spec = base_spec();
        spec.openings.push(OpeningSpec {
            x: 0.0,
            z: 5.0,
            width: 2.0,
            height: 3.0,
            ..OpeningSpec::default()
        });
        let plan = plan(&spec);
        // No block enters x in [-1, 1] between z = 3.5 and z = 6.5.
        for b in &plan.blocks {
            let vertical = b.bottom() < 6.5 - 1e-9 && b.top() > 3.5 + 1e-9;
            let horizontal = b.left() < 1.0 - 1e-9 && b.right() > -1.0 + 1e-9;
            assert!(
                !(vertical && horizontal),
                "block at x={} z={} intrudes into the opening",
                b.x,
                b.z
            );
        }
        // Edge blocks flank the opening in every intersecting row.
        let mut bands: Vec<(f64, f64)> = plan
            .blocks
            .iter()
            .filter(|b| b.bottom() < 6.5 - 1e-9 && b.top() > 3.5 + 1e-9)
            .map(|b| (b.bottom(), b.top()))
            .collect();
        bands.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        bands.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-9);
        assert!(!bands.is_empty());
        for (zb, zt) in bands {
            let in_band = |b: &&BlockSpec| (b.bottom() - zb).abs() < 1e-9 && (b.top() - zt).abs() < 1e-9;
            assert!(
                plan.blocks
                    .iter()
                    .filter(in_band)
                    .any(|b| (b.right() - -1.0).abs() < 1e-6),
                "no left edge block in band [{zb}, {zt}]"
            );
            assert!(
                plan.blocks
                    .iter()
                    .filter(in_band)
                    .any(|b| (b.left() - 1.0).abs() < 1e-6),
                "no right edge block in band [{zb}, {zt}]"
            );
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let mut spec = base_spec();
        spec.settings.width_var = 0.2;
        spec.settings.height_var = 0.1;
        spec.openings.push(OpeningSpec::default());
        let a = plan(&spec);
        let b = plan(&spec);
        assert_eq!(a, b);
        spec.seed += 1;
        let c = plan(&spec);
        assert_ne!(a, c);
    }

    #[test]
    fn test_arched_opening_produces_arch_records() {
        let mut spec = base_spec();
        spec.openings.push(OpeningSpec {
            x: 0.0,
            z: 4.0,
            width: 3.0,
            height: 2.0,
            arch_height_top: 2.0,
            arch_thickness_top: 0.3,
            ..OpeningSpec::default()
        });
        let plan = plan(&spec);
        assert_eq!(plan.arches.len(), 2);
        assert_eq!(plan.keystones.len(), 1);
    }

    #[test]
    fn test_merge_reduces_block_count() {
        let mut spec = base_spec();
        spec.settings.edge_offset = 0.0;
        let unmerged = plan(&spec);
        spec.merge_blocks = true;
        let merged = plan(&spec);
        assert!(merged.blocks.len() < unmerged.blocks.len());
    }

    #[test]
    fn test_features_add_blocks() {
        let mut spec = base_spec();
        let baseline = plan(&spec).blocks.len();
        spec.shelf = Some(ShelfSpec {
            x: -3.0,
            z: 4.0,
            width: 6.0,
            height: 1.0,
            depth: 1.2,
        });
        spec.steps = Some(StepSpec {
            x: 0.0,
            z: 0.0,
            width: 5.0,
            height: 3.0,
            depth: 1.0,
            riser: 0.5,
            tread: 0.8,
        });
        let plan = plan(&spec);
        assert!(plan.blocks.len() > baseline);
        assert!(plan.blocks.iter().any(|b| b.y != 0.0));
    }

    #[test]
    fn test_plan_serde_round_trip() {
        let mut spec = base_spec();
        spec.openings.push(OpeningSpec {
            arch_height_top: 0.5,
            arch_thickness_top: 0.2,
            ..OpeningSpec::default()
        });
        let plan = plan(&spec);
        let json = serde_json::to_string(&plan).unwrap();
        let back: WallPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, back);
    }

    #[test]
    fn test_radial_plan_stays_in_angular_bounds() {
        let mut spec = base_spec();
        spec.domain = WallDomain {
            start: 0.0,
            end: std::f64::consts::PI,
            bottom: 2.0,
            top: 8.0,
        };
        spec.radial = true;
        let plan = plan(&spec);
        assert!(!plan.blocks.is_empty());
        for b in &plan.blocks {
            assert!(b.left() >= -1e-9);
            assert!(b.right() <= std::f64::consts::PI + 1e-9);
        }
    }
}
