//! # Layout Records
//!
//! Plain-data records produced by planning and consumed by mesh
//! synthesis: blocks with optional per-corner offsets, arch spans,
//! keystones, and the assembled [`WallPlan`].
//!
//! All values are fully resolved - no randomness or settings lookups
//! remain once a record exists.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::context::WallDomain;
use crate::opening::Side;

// =============================================================================
// CORNER OFFSETS
// =============================================================================

/// Fixed 8-entry table of per-corner deltas applied to a block's box.
///
/// Entries 0-3 belong to the left end, 4-7 to the right end; each ring
/// is ordered back-bottom, front-bottom, front-top, back-top. The
/// synthesizer interpolates the two rings across interior subdivision
/// boundaries by horizontal fraction.
pub type CornerOffsets = [DVec3; 8];

/// Chamfers one end face toward the front by `amount`.
///
/// The front pair of the chosen end moves into the block, producing
/// the arrow-slit splay used on blocks adjoining opening edges and on
/// the first/last voussoir of an arch.
pub fn bevel_offsets(corners: &mut CornerOffsets, amount: f64, end: Side) {
    match end {
        Side::Left => {
            corners[1].x += amount;
            corners[2].x += amount;
        }
        Side::Right => {
            corners[5].x -= amount;
            corners[6].x -= amount;
        }
    }
}

/// Corner table for a front-face taper: the front pair of every ring
/// shrinks vertically by half the taper, splaying the block's profile.
pub fn taper_offsets(taper: f64) -> CornerOffsets {
    let mut corners = [DVec3::ZERO; 8];
    let half = taper / 2.0;
    for i in [1, 5] {
        corners[i].z += half;
    }
    for i in [2, 6] {
        corners[i].z -= half;
    }
    corners
}

// =============================================================================
// BLOCK RECORD
// =============================================================================

/// One rectangular block to synthesize.
///
/// `x`/`z` are the block center in wall coordinates (x in domain
/// units), `y` the depth-center offset used by shelf and step blocks.
/// `corners` tapers the block to hug a curved opening edge or a wall
/// bevel; `None` means a plain box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Horizontal center.
    pub x: f64,
    /// Depth-center offset (0 for ordinary wall blocks).
    pub y: f64,
    /// Vertical center.
    pub z: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Depth extent.
    pub depth: f64,
    /// Optional per-corner deltas.
    pub corners: Option<CornerOffsets>,
}

impl BlockSpec {
    /// Plain box centered on the wall face.
    pub fn new(x: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self {
            x,
            y: 0.0,
            z,
            width,
            height,
            depth,
            corners: None,
        }
    }

    /// Attaches a corner table.
    pub fn with_corners(mut self, corners: CornerOffsets) -> Self {
        self.corners = Some(corners);
        self
    }

    /// Left face position.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    /// Right face position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Bottom face position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.z - self.height / 2.0
    }

    /// Top face position.
    #[inline]
    pub fn top(&self) -> f64 {
        self.z + self.height / 2.0
    }
}

// =============================================================================
// ARCH RECORDS
// =============================================================================

/// One arc span to render as a ring of voussoirs.
///
/// Angles are radians measured from the vertical axis through the arc
/// center; `flip` mirrors the span downward for lower arches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchSpec {
    /// Arc center, horizontal (domain units).
    pub center_x: f64,
    /// Arc center, vertical.
    pub center_z: f64,
    /// Intrados radius.
    pub inner_radius: f64,
    /// Radial ring thickness.
    pub thickness: f64,
    /// Voussoir depth.
    pub depth: f64,
    /// Span start angle.
    pub angle_start: f64,
    /// Span end angle.
    pub angle_end: f64,
    /// Curve downward instead of upward.
    pub flip: bool,
    /// Inward chamfer on the first and last voussoir.
    pub bevel: f64,
    /// Target voussoir arc length at the mean radius.
    pub segment_width: f64,
    /// Minimum voussoir arc length.
    pub min_width: f64,
}

/// Apex block closing a pointed arch.
///
/// `z_bottom` is the intrados apex, `z_top` the outer apex; for lower
/// arches `z_top` lies below `z_bottom` and the prism is mirrored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystoneSpec {
    /// Horizontal center.
    pub x: f64,
    /// Apex-side vertex height.
    pub z_bottom: f64,
    /// Outer vertex height.
    pub z_top: f64,
    /// Width across the flanking arcs.
    pub width: f64,
    /// Prism depth.
    pub depth: f64,
    /// Raise of the back outer vertex.
    pub bevel: f64,
}

// =============================================================================
// WALL PLAN
// =============================================================================

/// Complete layout of one wall: every block, arch and keystone to
/// synthesize, plus the mode flags and warnings the mesh stage needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallPlan {
    /// Radial mode flag.
    pub radial: bool,
    /// Sloped mode flag.
    pub sloped: bool,
    /// Clamped wall bounds.
    pub domain: WallDomain,
    /// Maximum box subdivision extent (`<= 0` disables).
    pub subdivision: f64,
    /// All planned blocks, edge and fill alike.
    pub blocks: Vec<BlockSpec>,
    /// Arch spans.
    pub arches: Vec<ArchSpec>,
    /// Keystones.
    pub keystones: Vec<KeystoneSpec>,
    /// Diagnostics accumulated during planning.
    pub warnings: Vec<String>,
}

// =============================================================================
// TESTS
// =============================================================================
