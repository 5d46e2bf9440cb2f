//! # Wall Planning and Arch Placement
//!
//! Decides the row-boundary schedule for the whole wall (respecting
//! opening discontinuity heights so no block straddles a curve),
//! expands opening requests into resolved apertures, and derives the
//! arch, keystone and side-stone records for every arched opening.

use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;

use config::constants::{EPSILON, MIN_BLOCK_DIMENSION};
use glam::DVec3;

use crate::context::{GenerationContext, OpeningSpec};
use crate::divider::fill;
use crate::geometry::{ArchSpec, BlockSpec, CornerOffsets, KeystoneSpec};
use crate::opening::{ArchShape, Opening, VerticalSide};
use crate::row::Row;

// =============================================================================
// OPENING EXPANSION
// =============================================================================

/// Resolves every opening request into aperture models, tiling
/// repeated openings across the wall span. The wall perimeter is
/// always the first entry.
pub fn expand_openings(ctx: &mut GenerationContext, specs: &[OpeningSpec]) -> Vec<Opening> {
    let mut out = vec![Opening::perimeter(&ctx.domain, ctx.settings.bevel)];
    for spec in specs {
        if spec.width <= 0.0 {
            ctx.warn(format!(
                "opening width {} clamped to the smallest legal value",
                spec.width
            ));
        }
        if spec.repeat {
            // Repeat spacing floored so neighbouring copies keep at
            // least one minimum block between them.
            let min_spacing = spec.width.max(MIN_BLOCK_DIMENSION) + ctx.settings.width_min;
            let spacing = spec.x.max(min_spacing);
            let mut x = ctx.domain.start + spacing / 2.0;
            while x < ctx.domain.end {
                out.push(Opening::from_spec(spec, x));
                x += spacing;
            }
        } else {
            out.push(Opening::from_spec(spec, spec.x));
        }
    }
    out
}

// =============================================================================
// ROW SCHEDULE
// =============================================================================

/// Builds the row bands for the whole wall.
///
/// Required boundaries are the wall bottom/top, every opening's
/// discontinuity heights, and the optional fixed bottom/top rows.
/// The gaps between them are filled with natural boundaries by an
/// independent divider pass; naturals landing too close to a required
/// boundary are deleted to avoid sliver rows.
pub fn plan_rows(ctx: &mut GenerationContext, openings: &[Opening]) -> Vec<Row> {
    let domain = ctx.domain;
    let mut required = vec![domain.bottom];
    for o in &openings[1..] {
        for c in o.crits() {
            if c > domain.bottom + EPSILON && c < domain.top - EPSILON {
                required.push(c);
            }
        }
    }
    if ctx.settings.row_bottom > 0.0 {
        required.push((domain.bottom + ctx.settings.row_bottom).min(domain.top));
    }
    if ctx.settings.row_top > 0.0 {
        required.push((domain.top - ctx.settings.row_top).max(domain.bottom));
    }
    required.push(domain.top);
    required.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    required.dedup_by(|a, b| (*a - *b).abs() < EPSILON);

    let avg = ctx.settings.height + ctx.settings.grout;
    let min = ctx.settings.height_min.max(MIN_BLOCK_DIMENSION);
    let dev = if ctx.settings.row_lock {
        0.0
    } else {
        ctx.settings.height_var
    };

    let gaps = required.len() - 1;
    let mut boundaries = Vec::new();
    for (i, pair) in required.windows(2).enumerate() {
        boundaries.push(pair[0]);
        // Fixed bottom/top rows stay whole.
        if (i == 0 && ctx.settings.row_bottom > 0.0) || (i == gaps - 1 && ctx.settings.row_top > 0.0)
        {
            continue;
        }
        let cuts = fill(&mut ctx.rng, pair[0], pair[1], avg, min, dev, (0.0, 0.0), 0, false);
        for &c in &cuts[1..cuts.len() - 1] {
            // The divider's final snap gap may undercut the minimum;
            // drop naturals hugging either required boundary.
            if c - pair[0] >= min && pair[1] - c >= min {
                boundaries.push(c);
            }
        }
    }
    boundaries.push(domain.top);

    let mut rows = Vec::with_capacity(boundaries.len().saturating_sub(1));
    for (i, pair) in boundaries.windows(2).enumerate() {
        let g = ctx.roll_grout();
        let height = (pair[1] - pair[0] - g).max(MIN_BLOCK_DIMENSION);
        // Blocks sit on the lower boundary; the joint is below the next row.
        let center = pair[0] + height / 2.0;
        let radius = ctx.effective_radius(center);
        let stagger = if i % 2 == 1 {
            let mut s = ctx.settings.edge_offset;
            if ctx.settings.edge_offset_var > 0.0 {
                s += ctx.uniform() * ctx.settings.edge_offset_var;
            }
            s.max(0.0) / radius
        } else {
            0.0
        };
        rows.push(Row::new(center, height, stagger, radius));
    }
    rows
}

// =============================================================================
// ARCH PLACEMENT
// =============================================================================

/// Arch spans, keystones and side stones derived for one opening.
#[derive(Debug, Default)]
pub struct ArchPlacement {
    /// Voussoir ring spans.
    pub arches: Vec<ArchSpec>,
    /// Pointed-arch apex closures.
    pub keystones: Vec<KeystoneSpec>,
    /// Domed-arch springing blocks bridging the ring to the wall.
    pub side_stones: Vec<BlockSpec>,
}

/// Derives the arch geometry for both sides of an opening.
pub fn place_arches(ctx: &mut GenerationContext, opening: &Opening) -> ArchPlacement {
    let mut out = ArchPlacement::default();
    place_arch_side(ctx, opening, VerticalSide::Top, &mut out);
    place_arch_side(ctx, opening, VerticalSide::Bottom, &mut out);
    out
}

fn place_arch_side(
    ctx: &mut GenerationContext,
    o: &Opening,
    side: VerticalSide,
    out: &mut ArchPlacement,
) {
    let arch = *o.arch(side);
    if arch.shape == ArchShape::Flat || arch.thickness <= 0.0 {
        // A curved edge without a ring is covered by the rows' wedge
        // blocks alone.
        return;
    }
    let flip = side == VerticalSide::Bottom;
    let dir = if flip { -1.0 } else { 1.0 };
    let spring = o.spring(side);
    let er = ctx.effective_radius(spring);
    let depth = ctx.roll_depth();
    let r = arch.radius;
    let t = arch.thickness;

    match arch.shape {
        ArchShape::Flat => {}
        ArchShape::Pointed => {
            // Two mirrored arcs with centers on the spring line, offset
            // to either side of the opening center.
            let e = r - o.width / 2.0;
            let rm = r + t / 2.0;
            let kw = ctx.settings.width.min(o.width / 2.0);
            let keystone = kw >= ctx.settings.width_min;
            if !keystone {
                ctx.warn(format!(
                    "keystone width {kw} below minimum block width; arch at x={} left open",
                    o.x
                ));
            }
            // Each arc stops where its ring reaches the keystone side
            // (or the apex when the keystone is skipped).
            let reach = if keystone { e + kw / 2.0 } else { e };
            let apex_angle = (reach / rm).clamp(-1.0, 1.0).asin();
            let common = ArchSpec {
                center_x: 0.0,
                center_z: spring,
                inner_radius: r,
                thickness: t,
                depth,
                angle_start: 0.0,
                angle_end: 0.0,
                flip,
                bevel: o.bevel,
                segment_width: ctx.settings.width,
                min_width: ctx.settings.width_min,
            };
            out.arches.push(ArchSpec {
                center_x: o.x - e / er,
                angle_start: apex_angle,
                angle_end: FRAC_PI_2,
                ..common.clone()
            });
            out.arches.push(ArchSpec {
                center_x: o.x + e / er,
                angle_start: -FRAC_PI_2,
                angle_end: -apex_angle,
                ..common
            });
            if keystone {
                let inner_apex = (r * r - e * e).max(0.0).sqrt();
                let outer = r + t;
                let outer_apex = (outer * outer - e * e).max(0.0).sqrt();
                out.keystones.push(KeystoneSpec {
                    x: o.x,
                    z_bottom: spring + dir * inner_apex,
                    z_top: spring + dir * outer_apex,
                    width: kw / er,
                    depth,
                    bevel: o.bevel,
                });
            }
        }
        ArchShape::Domed => {
            // One continuous arc centered below the spring apex.
            let theta = (o.width / 2.0).atan2(r - arch.rise);
            out.arches.push(ArchSpec {
                center_x: o.x,
                center_z: spring + dir * (arch.rise - r),
                inner_radius: r,
                thickness: t,
                depth,
                angle_start: -theta,
                angle_end: theta,
                flip,
                bevel: o.bevel,
                segment_width: ctx.settings.width,
                min_width: ctx.settings.width_min,
            });
            if arch.corner > EPSILON {
                side_stones(o, &arch, dir, er, depth, out);
            }
        }
    }
}

/// Emits the two springing blocks of a low arch.
///
/// The ring's slanted end face runs from the intrados springing to its
/// outer corner at the corner height; the silhouette the rows fill
/// against stays flat at the full footprint over the same band. The
/// side stone fills the triangular gap between the two, its inner
/// corners offset to sit flush on the ring.
fn side_stones(
    o: &Opening,
    arch: &crate::opening::ArchProfile,
    dir: f64,
    er: f64,
    depth: f64,
    out: &mut ArchPlacement,
) {
    let half = o.width / 2.0;
    let footprint = arch.footprint(o.width);
    let ring_x = half * (arch.radius + arch.thickness) / arch.radius;
    let width = footprint - half;
    if width < MIN_BLOCK_DIMENSION || arch.corner < MIN_BLOCK_DIMENSION {
        return;
    }
    let spring = if dir > 0.0 {
        o.spring(VerticalSide::Top)
    } else {
        o.spring(VerticalSide::Bottom)
    };
    let slant = ring_x - half;
    for sign in [-1.0, 1.0] {
        let mut corners: CornerOffsets = [DVec3::ZERO; 8];
        // The inner face leans out to the ring's end-face corner at
        // the far (apex-side) edge of the block.
        let (a, b) = match (sign > 0.0, dir > 0.0) {
            (true, true) => (2, 3),
            (true, false) => (0, 1),
            (false, true) => (6, 7),
            (false, false) => (4, 5),
        };
        corners[a].x = sign * slant / er;
        corners[b].x = sign * slant / er;
        out.side_stones.push(BlockSpec {
            x: o.x + sign * (half + width / 2.0) / er,
            y: 0.0,
            z: spring + dir * arch.corner / 2.0,
            width: width / er,
            height: arch.corner,
            depth,
            corners: Some(corners),
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
