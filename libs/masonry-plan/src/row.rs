//! # Row Planning and Filling
//!
//! One row is a horizontal band of the wall. Planning sweeps the band
//! left to right over alternating edge zones (inside an opening or
//! the wall perimeter) and fill zones (ordinary masonry), deciding per
//! section between wedge stacks, single/double tapered blocks, or a
//! pair of edge blocks plus a fill segment. Filling then subdivides
//! the registered segments into randomized blocks.

use std::cmp::Ordering;

use config::constants::{EPSILON, MIN_BLOCK_DIMENSION};
use glam::DVec3;

use crate::context::GenerationContext;
use crate::divider::fill;
use crate::geometry::{bevel_offsets, taper_offsets, BlockSpec, CornerOffsets};
use crate::opening::{Opening, Side};

// =============================================================================
// ROW
// =============================================================================

/// A horizontal sub-range of a row awaiting ordinary block fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Left bound.
    pub left: f64,
    /// Right bound.
    pub right: f64,
}

/// One horizontal band of the wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Vertical center of the band.
    pub center_z: f64,
    /// Band height, grout already deducted.
    pub height: f64,
    /// Horizontal stagger applied to this row's fill divisions.
    pub edge_offset: f64,
    /// Effective radius at the band height (1 for flat walls).
    pub radius: f64,
    /// Blocks adjoining openings and the wall perimeter.
    pub edge_blocks: Vec<BlockSpec>,
    /// Ordinary fill blocks.
    pub fill_blocks: Vec<BlockSpec>,
    /// Sub-ranges still needing ordinary fill.
    pub segments: Vec<Segment>,
}

/// One side of a masonry section between two openings.
///
/// `dir` is +1 when the section lies to the bound's right (the bound
/// is the section's left wall) and -1 on the other side. `top`/`btm`
/// are the absolute edge positions at the row's top and bottom edges,
/// `None` where the opening silhouette is undefined at that height.
struct SectionBound<'a> {
    opening: &'a Opening,
    dir: f64,
    top: Option<f64>,
    btm: Option<f64>,
}

impl<'a> SectionBound<'a> {
    fn new(opening: &'a Opening, side: Side, dir: f64, zt: f64, zb: f64, radius: f64) -> Self {
        // Rows break exactly at opening crits, so query a hair inside
        // the band: at a sill/head boundary the silhouette is defined
        // on one side only, and the band interior picks the right one.
        let qt = zt - 2.0 * EPSILON;
        let qb = zb + 2.0 * EPSILON;
        Self {
            opening,
            dir,
            top: opening.edge_s(qt, side, radius).map(|off| opening.x + off),
            btm: opening.edge_s(qb, side, radius).map(|off| opening.x + off),
        }
    }

    /// True when the side needs curve-hugging wedge blocks: the edge
    /// is undefined at one of the row edges, or the top/bottom
    /// mismatch exceeds one average block width.
    fn is_wedge(&self, avg_width: f64) -> bool {
        match (self.top, self.btm) {
            (Some(t), Some(b)) => (t - b).abs() > avg_width,
            _ => true,
        }
    }

    /// Edge position nearest the section, center line as fallback.
    fn near(&self) -> f64 {
        match (self.top, self.btm) {
            (Some(t), Some(b)) => {
                if self.dir > 0.0 {
                    t.max(b)
                } else {
                    t.min(b)
                }
            }
            _ => self.opening.x,
        }
    }
}

/// Resolved state of one section side after wedge emission.
enum BoundState {
    /// Wedge stack already emitted; fill may start at `face`.
    Curved { face: f64 },
    /// Straight or gently slanted edge; the edge block is still owed.
    Straight {
        face: f64,
        top_dx: f64,
        btm_dx: f64,
        bevel: f64,
    },
}

impl BoundState {
    fn face(&self) -> f64 {
        match self {
            BoundState::Curved { face } => *face,
            BoundState::Straight { face, .. } => *face,
        }
    }
}

impl Row {
    /// Creates an empty row band.
    pub fn new(center_z: f64, height: f64, edge_offset: f64, radius: f64) -> Self {
        Self {
            center_z,
            height,
            edge_offset,
            radius,
            edge_blocks: Vec::new(),
            fill_blocks: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Top edge of the band.
    #[inline]
    pub fn top(&self) -> f64 {
        self.center_z + self.height / 2.0
    }

    /// Bottom edge of the band.
    #[inline]
    pub fn btm(&self) -> f64 {
        self.center_z - self.height / 2.0
    }

    // =========================================================================
    // EDGE PLANNING
    // =========================================================================

    /// Plans the row's edge blocks and fill segments against every
    /// opening. `openings[0]` must be the wall perimeter.
    pub fn plan_edges(&mut self, ctx: &mut GenerationContext, openings: &[Opening]) {
        let zt = self.top();
        let zb = self.btm();
        let wall = &openings[0];

        let mut crossings: Vec<&Opening> = openings[1..]
            .iter()
            .filter(|o| o.overlaps_band(zb, zt))
            .collect();

        // Overlapping apertures can produce incomparable orderings;
        // degrade to the input order instead of aborting the row.
        let mut degraded = false;
        crossings.sort_by(|a, b| {
            a.x.partial_cmp(&b.x).unwrap_or_else(|| {
                degraded = true;
                Ordering::Equal
            })
        });
        if degraded {
            ctx.warn(format!(
                "aperture ordering degraded to input order in row at z={}",
                self.center_z
            ));
        }

        // Trim apertures that lie entirely outside the wall span.
        let start = ctx.domain.start;
        let end = ctx.domain.end;
        let radius = self.radius;
        crossings.retain(|o| {
            let extent = o
                .top_arch
                .footprint(o.width)
                .max(o.bottom_arch.footprint(o.width))
                / radius;
            o.x + extent > start + EPSILON && o.x - extent < end - EPSILON
        });

        let mut left_bound = SectionBound::new(wall, Side::Left, 1.0, zt, zb, radius);
        for o in crossings {
            let right_bound = SectionBound::new(o, Side::Left, -1.0, zt, zb, radius);
            self.process_section(ctx, &left_bound, &right_bound);
            left_bound = SectionBound::new(o, Side::Right, 1.0, zt, zb, radius);
        }
        let right_bound = SectionBound::new(wall, Side::Right, -1.0, zt, zb, radius);
        self.process_section(ctx, &left_bound, &right_bound);
    }

    /// Decides the terminal shape of one section: wedges, one block,
    /// two blocks, or edge blocks plus a registered fill segment.
    fn process_section(
        &mut self,
        ctx: &mut GenerationContext,
        left: &SectionBound,
        right: &SectionBound,
    ) {
        let avg_w = ctx.settings.width / self.radius;
        let max_w = ctx.settings.max_width() / self.radius;
        let left_w = self.edge_width(ctx, left);
        let right_w = self.edge_width(ctx, right);

        let l_state = self.resolve_bound(ctx, left, avg_w, left_w);
        let r_state = self.resolve_bound(ctx, right, avg_w, right_w);

        let l_face = l_state.face();
        let r_face = r_state.face();
        let gap = r_face - l_face;
        if gap < MIN_BLOCK_DIMENSION {
            if gap < -EPSILON {
                tracing::debug!(
                    "section inverted at z={} (overlapping openings); skipped",
                    self.center_z
                );
            }
            return;
        }

        if gap < max_w {
            // One tapered block spans the whole section.
            let mut corners = [DVec3::ZERO; 8];
            apply_bound(&mut corners, &l_state, Side::Left);
            apply_bound(&mut corners, &r_state, Side::Right);
            self.push_edge_block(ctx, l_face, r_face, corners);
        } else if gap < 2.0 * max_w {
            // Randomized split; each half carries its own side's offsets.
            let split = l_face + gap * (0.25 + 0.5 * ctx.unit());
            let g = ctx.roll_grout() / self.radius;
            let mut corners = [DVec3::ZERO; 8];
            apply_bound(&mut corners, &l_state, Side::Left);
            self.push_edge_block(ctx, l_face, split - g / 2.0, corners);
            let mut corners = [DVec3::ZERO; 8];
            apply_bound(&mut corners, &r_state, Side::Right);
            self.push_edge_block(ctx, split + g / 2.0, r_face, corners);
        } else {
            // Edge blocks on the straight sides; wedge stacks already
            // cover the curved ones. The interior becomes a segment.
            if let BoundState::Straight { .. } = l_state {
                let mut corners = [DVec3::ZERO; 8];
                apply_bound(&mut corners, &l_state, Side::Left);
                self.push_edge_block(ctx, l_face, l_face + left_w, corners);
            }
            if let BoundState::Straight { .. } = r_state {
                let mut corners = [DVec3::ZERO; 8];
                apply_bound(&mut corners, &r_state, Side::Right);
                self.push_edge_block(ctx, r_face - right_w, r_face, corners);
            }
            let g = if ctx.settings.edge_grout {
                ctx.roll_grout() / self.radius
            } else {
                0.0
            };
            let seg = Segment {
                left: l_face + left_w + g,
                right: r_face - right_w - g,
            };
            if seg.right - seg.left >= MIN_BLOCK_DIMENSION {
                self.segments.push(seg);
            }
        }
    }

    /// Emits the wedge stack for curved bounds and computes the face
    /// and corner deltas for straight ones. A bound clamped to the
    /// wall span loses its offsets: the face is flat at the wall edge.
    fn resolve_bound(
        &mut self,
        ctx: &mut GenerationContext,
        bound: &SectionBound,
        avg_width: f64,
        edge_width: f64,
    ) -> BoundState {
        if bound.is_wedge(avg_width) {
            let face = self.wedge_blocks(ctx, bound, edge_width);
            return BoundState::Curved { face };
        }
        let near = bound.near();
        let face = near.clamp(ctx.domain.start, ctx.domain.end);
        if (face - near).abs() > EPSILON {
            return BoundState::Straight {
                face,
                top_dx: 0.0,
                btm_dx: 0.0,
                bevel: 0.0,
            };
        }
        let bevel = bound.opening.edge_bevel(self.center_z, self.radius)
            * bound.opening.kind.sign();
        BoundState::Straight {
            face,
            top_dx: bound.top.unwrap_or(face) - face,
            btm_dx: bound.btm.unwrap_or(face) - face,
            bevel,
        }
    }

    /// Re-divides the row's vertical span along a curved opening edge
    /// and emits one corner-offset block per division. Returns the
    /// section face the stack consumed up to.
    fn wedge_blocks(
        &mut self,
        ctx: &mut GenerationContext,
        bound: &SectionBound,
        edge_width: f64,
    ) -> f64 {
        let o = bound.opening;
        let side = if bound.dir > 0.0 { Side::Right } else { Side::Left };
        let cuts = fill(
            &mut ctx.rng,
            self.btm(),
            self.top(),
            ctx.settings.height,
            ctx.settings.height_min,
            ctx.settings.height_var,
            (0.0, 0.0),
            0,
            false,
        );
        // Edge position per cut, opening center line where undefined.
        let edges: Vec<f64> = cuts
            .iter()
            .map(|&z| {
                o.edge_s(z, side, self.radius)
                    .map_or(o.x, |off| o.x + off)
            })
            .collect();

        let mut face = if bound.dir > 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for (i, pair) in cuts.windows(2).enumerate() {
            let e0 = edges[i];
            let e1 = edges[i + 1];
            let base = if bound.dir > 0.0 { e0.max(e1) } else { e0.min(e1) };
            let (x0, x1) = if bound.dir > 0.0 {
                (base, base + edge_width)
            } else {
                (base - edge_width, base)
            };
            let g = ctx.roll_grout();
            let h = (pair[1] - pair[0] - g).max(MIN_BLOCK_DIMENSION);
            let depth = ctx.roll_depth();
            let mut corners: CornerOffsets = [DVec3::ZERO; 8];
            if bound.dir > 0.0 {
                corners[0].x = e0 - base;
                corners[1].x = e0 - base;
                corners[2].x = e1 - base;
                corners[3].x = e1 - base;
            } else {
                corners[4].x = e0 - base;
                corners[5].x = e0 - base;
                corners[6].x = e1 - base;
                corners[7].x = e1 - base;
            }
            self.edge_blocks.push(BlockSpec {
                x: (x0 + x1) / 2.0,
                y: 0.0,
                z: (pair[0] + pair[1]) / 2.0,
                width: edge_width,
                height: h,
                depth,
                corners: Some(corners),
            });
            face = if bound.dir > 0.0 {
                face.max(x1)
            } else {
                face.min(x0)
            };
        }
        if !face.is_finite() {
            // No divisions fit the band; fall back to the near edge.
            face = bound.near() + bound.dir * edge_width;
        }
        face
    }

    /// Width of the edge piece against a bound: the maximum of the
    /// configured width, the opening's required edge thickness, and
    /// the bevel-adjusted minimum.
    fn edge_width(&self, ctx: &GenerationContext, bound: &SectionBound) -> f64 {
        let o = bound.opening;
        let bevel = o.edge_bevel(self.center_z, self.radius);
        (ctx.settings.width / self.radius)
            .max(o.edge_thickness / self.radius)
            .max(ctx.settings.width_min / self.radius + bevel)
    }

    /// Pushes one edge block spanning `[x0, x1]` with the given
    /// corner table (dropped when all-zero).
    fn push_edge_block(
        &mut self,
        ctx: &mut GenerationContext,
        x0: f64,
        x1: f64,
        corners: CornerOffsets,
    ) {
        let width = x1 - x0;
        if width < MIN_BLOCK_DIMENSION {
            return;
        }
        let depth = ctx.roll_depth();
        let tapered = corners.iter().any(|c| *c != DVec3::ZERO);
        self.edge_blocks.push(BlockSpec {
            x: (x0 + x1) / 2.0,
            y: 0.0,
            z: self.center_z,
            width,
            height: self.height,
            depth,
            corners: tapered.then_some(corners),
        });
    }

    // =========================================================================
    // FILLING
    // =========================================================================

    /// Subdivides every registered segment into randomized blocks,
    /// re-rolling grout and depth jitter per block. Segments are
    /// consumed.
    pub fn fill_blocks(&mut self, ctx: &mut GenerationContext) {
        let radius = self.radius;
        // Short crit-forced rows get proportionally narrower blocks.
        let weight = (self.height / ctx.settings.height.max(MIN_BLOCK_DIMENSION)).clamp(0.5, 1.5);
        let avg = (ctx.settings.width + ctx.settings.grout) * weight / radius;
        let min = ctx.settings.width_min * weight / radius;
        let dev = ctx.settings.width_var * weight / radius;
        let taper = ctx.settings.taper;
        let stagger = self.edge_offset.max(0.0);

        let segments = std::mem::take(&mut self.segments);
        for seg in &segments {
            let cuts = fill(
                &mut ctx.rng,
                seg.left,
                seg.right,
                avg,
                min,
                dev,
                (stagger, 0.0),
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
                let depth = ctx.roll_depth();
                let mut block = BlockSpec::new(
                    pair[0] + width / 2.0,
                    self.center_z,
                    width,
                    self.height,
                    depth,
                );
                if taper > 0.0 {
                    block = block.with_corners(taper_offsets(taper));
                }
                self.fill_blocks.push(block);
            }
        }
    }
}

/// Writes one bound's edge deltas and chamfer into the corner table.
fn apply_bound(corners: &mut CornerOffsets, state: &BoundState, end: Side) {
    if let BoundState::Straight {
        top_dx,
        btm_dx,
        bevel,
        ..
    } = state
    {
        match end {
            Side::Left => {
                corners[0].x = *btm_dx;
                corners[1].x = *btm_dx;
                corners[2].x = *top_dx;
                corners[3].x = *top_dx;
            }
            Side::Right => {
                corners[4].x = *btm_dx;
                corners[5].x = *btm_dx;
                corners[6].x = *top_dx;
                corners[7].x = *top_dx;
            }
        }
        if bevel.abs() > 0.0 {
            bevel_offsets(corners, *bevel, end);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
