//! # Generation Context
//!
//! Input records for one generation pass and the mutable per-call
//! context (clamped configuration + seeded random source + warnings).
//!
//! The original design kept wall bounds, block statistics and the
//! random source as process-wide mutable state; here they are bound
//! into an explicit [`GenerationContext`] constructed per call, so
//! concurrent generation of different walls is safe by construction.

use config::constants::{MIN_EFFECTIVE_RADIUS, MIN_SPAN};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// =============================================================================
// WALL DOMAIN
// =============================================================================

/// Horizontal and vertical bounds of the wall.
///
/// In radial mode the horizontal range is angular (radians) and the
/// vertical range is read as a radius; otherwise both are linear.
///
/// # Example
///
/// ```rust
/// use masonry_plan::WallDomain;
///
/// let domain = WallDomain { start: -10.0, end: 10.0, bottom: 0.0, top: 10.0 };
/// assert_eq!(domain.width(), 20.0);
/// assert_eq!(domain.height(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallDomain {
    /// Left horizontal bound.
    pub start: f64,
    /// Right horizontal bound.
    pub end: f64,
    /// Lower vertical bound.
    pub bottom: f64,
    /// Upper vertical bound.
    pub top: f64,
}

impl Default for WallDomain {
    fn default() -> Self {
        Self {
            start: -5.0,
            end: 5.0,
            bottom: 0.0,
            top: 5.0,
        }
    }
}

impl WallDomain {
    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Returns a copy with inverted or collapsed bounds clamped to the
    /// smallest legal span. Invalid configuration degrades instead of
    /// failing the whole generation pass.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        if out.end <= out.start {
            out.end = out.start + MIN_SPAN;
        }
        if out.top <= out.bottom {
            out.top = out.bottom + MIN_SPAN;
        }
        out
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Flat block-statistics record, immutable for one generation pass.
///
/// Read by nearly every component: block dimensions and their jitter,
/// grout, bevel/taper shaping, row layout knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Average block width.
    pub width: f64,
    /// Random width deviation (uniform, +/-).
    pub width_var: f64,
    /// Hard minimum block width.
    pub width_min: f64,
    /// Average row/block height.
    pub height: f64,
    /// Random height deviation applied to row boundaries.
    pub height_var: f64,
    /// Hard minimum block height.
    pub height_min: f64,
    /// Average block depth.
    pub depth: f64,
    /// Random depth deviation, re-rolled per block.
    pub depth_var: f64,
    /// Grout thickness between blocks.
    pub grout: f64,
    /// Random grout deviation, re-rolled per block.
    pub grout_var: f64,
    /// Grout depth: how far block faces recess behind the nominal face.
    pub grout_depth: f64,
    /// Chamfer applied to block faces adjoining opening edges.
    pub bevel: f64,
    /// Front-face taper applied to ordinary fill blocks.
    pub taper: f64,
    /// Maximum subdivision extent for synthesized boxes (`<= 0` disables).
    pub subdivision: f64,
    /// Suppress per-row height jitter.
    pub row_lock: bool,
    /// Horizontal stagger applied to alternating rows.
    pub edge_offset: f64,
    /// Random deviation of the stagger.
    pub edge_offset_var: f64,
    /// Fixed bottom row height (`0` = none).
    pub row_bottom: f64,
    /// Fixed top row height (`0` = none).
    pub row_top: f64,
    /// Apply grout gaps where fill blocks meet edge blocks and openings.
    pub edge_grout: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 1.0,
            width_var: 0.0,
            width_min: 0.25,
            height: 0.5,
            height_var: 0.0,
            height_min: 0.125,
            depth: 0.5,
            depth_var: 0.0,
            grout: 0.05,
            grout_var: 0.0,
            grout_depth: 0.0,
            bevel: 0.0,
            taper: 0.0,
            subdivision: 0.0,
            row_lock: false,
            edge_offset: 0.5,
            edge_offset_var: 0.0,
            row_bottom: 0.0,
            row_top: 0.0,
            edge_grout: true,
        }
    }
}

impl Settings {
    /// Largest width a single random block can take.
    #[inline]
    pub fn max_width(&self) -> f64 {
        self.width + self.width_var
    }
}

// =============================================================================
// USER-FACING SPECS
// =============================================================================

/// One aperture request: window, door, slot or crenel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    /// Horizontal center (or repeat spacing when `repeat` is set).
    pub x: f64,
    /// Vertical center.
    pub z: f64,
    /// Opening width (clamped to the smallest legal value if non-positive).
    pub width: f64,
    /// Height of the straight portion of the opening.
    pub height: f64,
    /// Tile copies of this opening across the wall span.
    pub repeat: bool,
    /// Chamfer depth on the blocks lining the opening.
    pub bevel: f64,
    /// Minimum width of the blocks lining the opening.
    pub edge_thickness: f64,
    /// Rise of the upper arch (`0` = square head).
    pub arch_height_top: f64,
    /// Ring thickness of the upper arch.
    pub arch_thickness_top: f64,
    /// Rise of the lower arch (`0` = flat sill).
    pub arch_height_bottom: f64,
    /// Ring thickness of the lower arch.
    pub arch_thickness_bottom: f64,
}

impl Default for OpeningSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            z: 2.5,
            width: 1.5,
            height: 2.0,
            repeat: false,
            bevel: 0.0,
            edge_thickness: 0.0,
            arch_height_top: 0.0,
            arch_thickness_top: 0.0,
            arch_height_bottom: 0.0,
            arch_thickness_bottom: 0.0,
        }
    }
}

/// Rectangular ledge protruding from the wall face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShelfSpec {
    /// Left edge of the shelf region.
    pub x: f64,
    /// Bottom edge of the shelf region.
    pub z: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Depth of the shelf blocks.
    pub depth: f64,
}

/// Staircase region tiled with shrinking rows of blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Left edge of the step region.
    pub x: f64,
    /// Bottom edge of the step region.
    pub z: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Depth of the step blocks.
    pub depth: f64,
    /// Height of one step.
    pub riser: f64,
    /// Horizontal shrink per step.
    pub tread: f64,
}

/// Complete input for one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    /// Wall bounds.
    pub domain: WallDomain,
    /// Block statistics.
    pub settings: Settings,
    /// Wrap the wall around a central axis (horizontal = angle).
    pub radial: bool,
    /// Additionally warp the wall into a vault/dome profile.
    pub sloped: bool,
    /// Aperture requests.
    pub openings: Vec<OpeningSpec>,
    /// Merge vertically adjacent matching blocks into taller ones.
    pub merge_blocks: bool,
    /// Optional shelf feature.
    pub shelf: Option<ShelfSpec>,
    /// Put the shelf on the back face.
    pub shelf_on_back: bool,
    /// Optional steps feature.
    pub steps: Option<StepSpec>,
    /// Steps descend to the left instead of the right.
    pub steps_leftward: bool,
    /// Emit only cantilevered treads, no supporting columns.
    pub steps_only: bool,
    /// Put the steps on the back face.
    pub steps_on_back: bool,
    /// Seed for the generation random source.
    pub seed: u64,
}

impl Default for WallSpec {
    fn default() -> Self {
        Self {
            domain: WallDomain::default(),
            settings: Settings::default(),
            radial: false,
            sloped: false,
            openings: Vec::new(),
            merge_blocks: false,
            shelf: None,
            shelf_on_back: false,
            steps: None,
            steps_leftward: false,
            steps_only: false,
            steps_on_back: false,
            seed: 0,
        }
    }
}

// =============================================================================
// EFFECTIVE RADIUS
// =============================================================================

/// Effective radius divisor for horizontal distances at height `z`.
///
/// Flat walls use `1.0`. Radial walls reinterpret the horizontal axis
/// as an angle, so real-world sizes shrink by the radius at the
/// point's height; sloped radial walls use the vault profile's radius
/// instead. Floored so rows at the axis never divide by zero.
pub fn effective_radius(radial: bool, sloped: bool, top: f64, z: f64) -> f64 {
    if !radial {
        return 1.0;
    }
    let r = if sloped {
        let top = top.max(MIN_SPAN);
        top * (z * PI / (2.0 * top)).sin()
    } else {
        z
    };
    r.abs().max(MIN_EFFECTIVE_RADIUS)
}

// =============================================================================
// GENERATION CONTEXT
// =============================================================================

/// Mutable state for one generation pass.
///
/// Owns the clamped domain/settings, the seeded random source, and the
/// warning channel. Every planning component takes `&mut` access; the
/// context never outlives the pass.
#[derive(Debug)]
pub struct GenerationContext {
    /// Clamped wall bounds.
    pub domain: WallDomain,
    /// Block statistics.
    pub settings: Settings,
    /// Radial mode flag.
    pub radial: bool,
    /// Sloped mode flag.
    pub sloped: bool,
    /// Seeded random source; all draws in a pass go through this.
    pub rng: ChaCha8Rng,
    /// Diagnostics accumulated during planning.
    pub warnings: Vec<String>,
}

impl GenerationContext {
    /// Builds the context from a wall spec, clamping invalid bounds.
    pub fn new(spec: &WallSpec) -> Self {
        let domain = spec.domain.clamped();
        let mut warnings = Vec::new();
        if domain != spec.domain {
            let message = format!(
                "wall bounds clamped to start={} end={} bottom={} top={}",
                domain.start, domain.end, domain.bottom, domain.top
            );
            tracing::warn!("{message}");
            warnings.push(message);
        }
        Self {
            domain,
            settings: spec.settings.clone(),
            radial: spec.radial,
            sloped: spec.sloped,
            rng: ChaCha8Rng::seed_from_u64(spec.seed),
            warnings,
        }
    }

    /// Uniform draw in `[-1, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen_range(-1.0..1.0)
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Records a diagnostic without aborting the pass.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    /// Effective radius for the configured modes at height `z`.
    #[inline]
    pub fn effective_radius(&self, z: f64) -> f64 {
        effective_radius(self.radial, self.sloped, self.domain.top, z)
    }

    /// Grout thickness with per-call jitter.
    pub fn roll_grout(&mut self) -> f64 {
        let g = if self.settings.grout_var > 0.0 {
            self.settings.grout + self.uniform() * self.settings.grout_var
        } else {
            self.settings.grout
        };
        g.max(0.0)
    }

    /// Block depth with per-call jitter, recessed by the grout depth.
    pub fn roll_depth(&mut self) -> f64 {
        let mut d = self.settings.depth - self.settings.grout_depth;
        if self.settings.depth_var > 0.0 {
            d += self.uniform() * self.settings.depth_var;
        }
        d.max(config::constants::MIN_BLOCK_DIMENSION)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_clamps_inverted_bounds() {
        let domain = WallDomain {
            start: 5.0,
            end: 5.0,
            bottom: 2.0,
            top: 1.0,
        };
        let clamped = domain.clamped();
        assert!(clamped.width() > 0.0);
        assert!(clamped.height() > 0.0);
    }

    #[test]
    fn test_context_records_clamp_warning() {
        let spec = WallSpec {
            domain: WallDomain {
                start: 0.0,
                end: -1.0,
                bottom: 0.0,
                top: 3.0,
            },
            ..WallSpec::default()
        };
        let ctx = GenerationContext::new(&spec);
        assert_eq!(ctx.warnings.len(), 1);
        assert!(ctx.domain.width() > 0.0);
    }

    #[test]
    fn test_effective_radius_flat_wall() {
        assert_eq!(effective_radius(false, false, 10.0, 3.0), 1.0);
    }

    #[test]
    fn test_effective_radius_radial() {
        assert_eq!(effective_radius(true, false, 10.0, 3.0), 3.0);
        // Floored at the axis.
        assert!(effective_radius(true, false, 10.0, 0.0) > 0.0);
    }

    #[test]
    fn test_effective_radius_sloped() {
        // Vault profile: top * sin(z * pi / (2 * top)).
        let r = effective_radius(true, true, 10.0, 10.0);
        assert!((r - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_draws_are_deterministic() {
        let spec = WallSpec::default();
        let mut a = GenerationContext::new(&spec);
        let mut b = GenerationContext::new(&spec);
        for _ in 0..16 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn test_wall_spec_serde_round_trip() {
        let spec = WallSpec {
            openings: vec![OpeningSpec::default()],
            shelf: Some(ShelfSpec {
                x: 0.0,
                z: 1.0,
                width: 2.0,
                height: 0.5,
                depth: 0.8,
            }),
            seed: 7,
            ..WallSpec::default()
        };
        let json = serde_json::to_string(&spec).unwrap();
        let back: WallSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, back);
    }
}
