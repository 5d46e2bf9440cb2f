//! # Feature Injection
//!
//! Post-fill passes over the planned wall: merging vertically adjacent
//! matching blocks into taller ones, tiling a shelf ledge, and tiling
//! a staircase of shrinking rows (or bare cantilevered treads).

use config::constants::{EPSILON, MIN_BLOCK_DIMENSION};

use crate::context::{GenerationContext, ShelfSpec, StepSpec};
use crate::divider::fill;
use crate::geometry::BlockSpec;
use crate::row::Row;

// =============================================================================
// BLOCK MERGING
// =============================================================================

/// Merges fill blocks of vertically adjacent rows whose width and
/// horizontal center match within a radius-scaled grout tolerance.
///
/// The merged block replaces the upper row's block and keeps its slot,
/// so a column can keep growing across further row pairs. Tapered
/// blocks never merge.
pub fn merge_rows(ctx: &GenerationContext, rows: &mut [Row]) {
    for i in 0..rows.len().saturating_sub(1) {
        let (lower_rows, upper_rows) = rows.split_at_mut(i + 1);
        let lower = &mut lower_rows[i];
        let upper = &mut upper_rows[0];
        let tol = ctx.settings.grout.max(EPSILON) / upper.radius;

        let mut li = 0;
        let mut ui = 0;
        while li < lower.fill_blocks.len() && ui < upper.fill_blocks.len() {
            let l = &lower.fill_blocks[li];
            let u = &upper.fill_blocks[ui];
            if l.corners.is_some() {
                li += 1;
                continue;
            }
            if u.corners.is_some() {
                ui += 1;
                continue;
            }
            if (l.x - u.x).abs() <= tol && (l.width - u.width).abs() <= tol {
                let bottom = l.bottom();
                let top = u.top();
                let merged = BlockSpec {
                    x: l.x,
                    y: 0.0,
                    z: (bottom + top) / 2.0,
                    width: l.width,
                    height: top - bottom,
                    depth: l.depth.min(u.depth),
                    corners: None,
                };
                upper.fill_blocks[ui] = merged;
                lower.fill_blocks.remove(li);
                ui += 1;
            } else if l.x < u.x {
                li += 1;
            } else {
                ui += 1;
            }
        }
    }
}

// =============================================================================
// SHELF
// =============================================================================

/// Depth offset placing a feature block flush with the wall's back
/// face and protruding out the front (or mirrored onto the back).
fn protrusion(ctx: &GenerationContext, depth: f64, on_back: bool) -> f64 {
    let side = if on_back { -1.0 } else { 1.0 };
    side * (depth - ctx.settings.depth) / 2.0
}

/// Tiles the shelf region with depth-offset block rows forming a ledge.
pub fn shelf_blocks(
    ctx: &mut GenerationContext,
    shelf: &ShelfSpec,
    on_back: bool,
    blocks: &mut Vec<BlockSpec>,
) {
    if shelf.width <= 0.0 || shelf.height <= 0.0 || shelf.depth <= 0.0 {
        ctx.warn("degenerate shelf region; skipped");
        return;
    }
    let y = protrusion(ctx, shelf.depth, on_back);
    let bands = fill(
        &mut ctx.rng,
        shelf.z,
        shelf.z + shelf.height,
        ctx.settings.height + ctx.settings.grout,
        ctx.settings.height_min.max(MIN_BLOCK_DIMENSION),
        0.0,
        (0.0, 0.0),
        0,
        false,
    );
    for band in bands.windows(2) {
        let radius = ctx.effective_radius((band[0] + band[1]) / 2.0);
        tile_band(
            ctx,
            shelf.x,
            shelf.x + shelf.width / radius,
            band[0],
            band[1],
            radius,
            shelf.depth,
            y,
            blocks,
        );
    }
}

/// Fills one horizontal band of a feature region with divider blocks.
#[allow(clippy::too_many_arguments)]
fn tile_band(
    ctx: &mut GenerationContext,
    left: f64,
    right: f64,
    zb: f64,
    zt: f64,
    radius: f64,
    depth: f64,
    y: f64,
    blocks: &mut Vec<BlockSpec>,
) {
    let g = ctx.roll_grout();
    let height = (zt - zb - g).max(MIN_BLOCK_DIMENSION);
    let cuts = fill(
        &mut ctx.rng,
        left,
        right,
        (ctx.settings.width + ctx.settings.grout) / radius,
        ctx.settings.width_min / radius,
        ctx.settings.width_var / radius,
        (0.0, 0.0),
        0,
        false,
    );
    for (i, pair) in cuts.windows(2).enumerate() {
        let last = i + 2 == cuts.len();
        let g = if last { 0.0 } else { ctx.roll_grout() / radius };
        let width = pair[1] - pair[0] - g;
        if width < MIN_BLOCK_DIMENSION {
            continue;
        }
        blocks.push(BlockSpec {
            x: pair[0] + width / 2.0,
            y,
            z: zb + height / 2.0,
            width,
            height,
            depth,
            corners: None,
        });
    }
}

// =============================================================================
// STEPS
// =============================================================================

/// Tiles the step region with shrinking rows forming a staircase.
///
/// Each level is one riser tall and loses one tread of width on the
/// descending side. `only` emits just the exposed tread block per
/// level instead of the full supporting row.
pub fn step_blocks(
    ctx: &mut GenerationContext,
    steps: &StepSpec,
    leftward: bool,
    only: bool,
    on_back: bool,
    blocks: &mut Vec<BlockSpec>,
) {
    if steps.width <= 0.0 || steps.height <= 0.0 || steps.depth <= 0.0 {
        ctx.warn("degenerate step region; skipped");
        return;
    }
    let riser = if steps.riser > 0.0 {
        steps.riser
    } else {
        ctx.settings.height
    };
    let tread = if steps.tread > 0.0 {
        steps.tread
    } else {
        ctx.settings.width
    };
    let y = protrusion(ctx, steps.depth, on_back);

    let mut level = 0usize;
    loop {
        let z0 = steps.z + level as f64 * riser;
        if z0 + riser > steps.z + steps.height + EPSILON {
            break;
        }
        let radius = ctx.effective_radius(z0 + riser / 2.0);
        let shrink = (level as f64 * tread).min(steps.width);
        let (left, right) = if leftward {
            (steps.x + shrink / radius, steps.x + steps.width / radius)
        } else {
            (steps.x, steps.x + (steps.width - shrink) / radius)
        };
        if right - left < MIN_BLOCK_DIMENSION {
            break;
        }
        if only {
            // One cantilevered tread at the descending edge.
            let w = (tread / radius).min(right - left);
            let (x0, x1) = if leftward {
                (left, left + w)
            } else {
                (right - w, right)
            };
            blocks.push(BlockSpec {
                x: (x0 + x1) / 2.0,
                y,
                z: z0 + riser / 2.0,
                width: x1 - x0,
                height: riser,
                depth: steps.depth,
                corners: None,
            });
        } else {
            tile_band(ctx, left, right, z0, z0 + riser, radius, steps.depth, y, blocks);
        }
        level += 1;
    }
}

// =============================================================================
// TESTS
// =============================================================================
