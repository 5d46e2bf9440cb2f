//! # Opening Model
//!
//! Derived aperture geometry: optional pointed or domed arches top and
//! bottom, silhouette queries by height and by horizontal position,
//! and the discontinuity heights that force row boundaries.
//!
//! A variant kind represents the wall's own outer boundary as a giant
//! background "opening" with inverted sidedness, so every row can be
//! clipped against walls and apertures through one query surface.
//!
//! All arch geometry is resolved at construction; the queries are pure
//! and return `None` for geometrically infeasible circle intercepts
//! instead of raising a numeric fault.

use config::constants::{EPSILON, MIN_OPENING_WIDTH};
use serde::{Deserialize, Serialize};

use crate::context::{OpeningSpec, WallDomain};

// =============================================================================
// SIDES AND KINDS
// =============================================================================

/// Horizontal side of an opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
}

impl Side {
    /// Sign of the side: -1 for left, +1 for right.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Vertical side of an opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalSide {
    /// The head of the opening.
    Top,
    /// The sill of the opening.
    Bottom,
}

/// Which region of the wall an opening describes.
///
/// An `Aperture` removes masonry inside its silhouette. A `Perimeter`
/// inverts sidedness: masonry lies *inside* the silhouette and the
/// queries describe the wall's outer boundary. The sign selected at
/// query time replaces the inheritance the concept is usually
/// expressed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpeningKind {
    /// Window, door, slot or crenel carved out of the wall.
    Aperture,
    /// The wall's outer boundary treated as a background opening.
    Perimeter,
}

impl OpeningKind {
    /// Sidedness sign: +1 for apertures, -1 for the perimeter.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            OpeningKind::Aperture => 1.0,
            OpeningKind::Perimeter => -1.0,
        }
    }
}

// =============================================================================
// ARCH PROFILE
// =============================================================================

/// Shape class of one arch, decided by rise versus half-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchShape {
    /// No arch: the opening edge is square.
    Flat,
    /// Rise >= half-width: two mirrored arcs closed by a keystone.
    Pointed,
    /// 0 < rise < half-width: one continuous arc.
    Domed,
}

/// Resolved geometry of one arch side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchProfile {
    /// Arch rise above the spring line.
    pub rise: f64,
    /// Radial thickness of the voussoir ring.
    pub thickness: f64,
    /// Intrados radius (0 for flat).
    pub radius: f64,
    /// Vertical footprint of the ring thickness at the springing;
    /// nonzero only for domed arches, where it marks the flat
    /// transition band that side stones bridge.
    pub corner: f64,
    /// Shape class.
    pub shape: ArchShape,
}

impl ArchProfile {
    /// Derives the profile from rise `v`, ring thickness `t` and the
    /// opening width `w`.
    ///
    /// - `v >= w/2`: radius `v^2/w + w/4` (two-arc form).
    /// - `0 < v < w/2`: radius `w^2/(8v) + v/2` (single arc), corner
    ///   `t * cos(atan(w / (2(r - v)))) = t (r - v) / r`.
    pub fn derive(rise: f64, thickness: f64, width: f64) -> Self {
        let half = width / 2.0;
        if rise <= 0.0 {
            return Self {
                rise: 0.0,
                thickness: 0.0,
                radius: 0.0,
                corner: 0.0,
                shape: ArchShape::Flat,
            };
        }
        if rise >= half {
            let radius = rise * rise / width + width / 4.0;
            Self {
                rise,
                thickness,
                radius,
                corner: 0.0,
                shape: ArchShape::Pointed,
            }
        } else {
            let radius = width * width / (8.0 * rise) + rise / 2.0;
            // cos(atan(w / (2(r - v)))) collapses to (r - v) / r on the
            // springing circle.
            let corner = thickness * (radius - rise) / radius;
            Self {
                rise,
                thickness,
                radius,
                corner,
                shape: ArchShape::Domed,
            }
        }
    }

    /// Outer extent of the arch above the spring line, ring included.
    pub fn outer_rise(&self, width: f64) -> f64 {
        let outer = self.radius + self.thickness;
        match self.shape {
            ArchShape::Flat => 0.0,
            ArchShape::Pointed => {
                let center_off = self.radius - width / 2.0;
                (outer * outer - center_off * center_off).max(0.0).sqrt()
            }
            ArchShape::Domed => self.rise + self.thickness,
        }
    }

    /// Widest horizontal half-extent of the arch, ring included.
    pub fn footprint(&self, width: f64) -> f64 {
        let outer = self.radius + self.thickness;
        match self.shape {
            ArchShape::Flat => width / 2.0,
            ArchShape::Pointed => width / 2.0 + self.thickness,
            ArchShape::Domed => {
                let center_drop = self.radius - self.rise;
                (outer * outer - center_drop * center_drop).max(0.0).sqrt()
            }
        }
    }

    /// Silhouette half-extent at `dz` above the spring line.
    ///
    /// Splits into the transition band (flat, full footprint) and the
    /// curve band (outer-circle half-chord); `None` past the outer
    /// extent or when the intercept is infeasible.
    fn half_extent_above(&self, width: f64, dz: f64) -> Option<f64> {
        let outer = self.radius + self.thickness;
        match self.shape {
            ArchShape::Flat => None,
            ArchShape::Pointed => {
                let center_off = self.radius - width / 2.0;
                let chord = half_chord(outer, dz)? - center_off;
                if chord <= 0.0 {
                    None
                } else {
                    Some(chord)
                }
            }
            ArchShape::Domed => {
                if dz <= self.corner {
                    Some(self.footprint(width))
                } else {
                    half_chord(outer, dz + self.radius - self.rise)
                }
            }
        }
    }

    /// Silhouette height above the spring line at real offset `dx`
    /// from the opening center.
    fn rise_at(&self, width: f64, dx: f64) -> Option<f64> {
        let dx = dx.abs();
        if dx > self.footprint(width) + EPSILON {
            return None;
        }
        let outer = self.radius + self.thickness;
        match self.shape {
            ArchShape::Flat => Some(0.0),
            ArchShape::Pointed => {
                let center_off = self.radius - width / 2.0;
                Some(half_chord(outer, dx + center_off)?)
            }
            ArchShape::Domed => {
                let above_center = half_chord(outer, dx)?;
                Some((above_center - (self.radius - self.rise)).max(0.0))
            }
        }
    }
}

/// Half-chord of a circle at the given offset from its center.
///
/// `None` when the offset exceeds the radius - the caller treats the
/// query as "no valid edge here" rather than a numeric fault.
fn half_chord(radius: f64, offset: f64) -> Option<f64> {
    if offset.abs() > radius {
        None
    } else {
        Some((radius * radius - offset * offset).sqrt())
    }
}

// =============================================================================
// OPENING
// =============================================================================

/// One resolved opening: position, clamped width, straight span and
/// the two arch profiles. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Horizontal center (domain units: an angle in radial mode).
    pub x: f64,
    /// Vertical center of the straight span.
    pub z: f64,
    /// Width of the straight span (real units, clamped positive).
    pub width: f64,
    /// Height of the straight span.
    pub height: f64,
    /// Upper arch.
    pub top_arch: ArchProfile,
    /// Lower arch.
    pub bottom_arch: ArchProfile,
    /// Chamfer depth on adjoining block faces.
    pub bevel: f64,
    /// Minimum width of adjoining edge blocks.
    pub edge_thickness: f64,
    /// Aperture or inverted perimeter.
    pub kind: OpeningKind,
}

impl Opening {
    /// Builds an aperture from its spec at an explicit center,
    /// clamping a non-positive width to the smallest legal value.
    pub fn from_spec(spec: &OpeningSpec, x: f64) -> Self {
        let width = spec.width.max(MIN_OPENING_WIDTH);
        let height = spec.height.max(0.0);
        Self {
            x,
            z: spec.z,
            width,
            height,
            top_arch: ArchProfile::derive(spec.arch_height_top, spec.arch_thickness_top, width),
            bottom_arch: ArchProfile::derive(
                spec.arch_height_bottom,
                spec.arch_thickness_bottom,
                width,
            ),
            bevel: spec.bevel.max(0.0),
            edge_thickness: spec.edge_thickness.max(0.0),
            kind: OpeningKind::Aperture,
        }
    }

    /// Builds the wall perimeter as a background opening. Its extents
    /// are in domain units and its sidedness is inverted.
    pub fn perimeter(domain: &WallDomain, bevel: f64) -> Self {
        Self {
            x: (domain.start + domain.end) / 2.0,
            z: (domain.bottom + domain.top) / 2.0,
            width: domain.width(),
            height: domain.height(),
            top_arch: ArchProfile::derive(0.0, 0.0, domain.width()),
            bottom_arch: ArchProfile::derive(0.0, 0.0, domain.width()),
            bevel,
            edge_thickness: 0.0,
            kind: OpeningKind::Perimeter,
        }
    }

    /// Spring line height of the given vertical side.
    #[inline]
    pub fn spring(&self, side: VerticalSide) -> f64 {
        match side {
            VerticalSide::Top => self.z + self.height / 2.0,
            VerticalSide::Bottom => self.z - self.height / 2.0,
        }
    }

    /// Arch profile of the given vertical side.
    #[inline]
    pub fn arch(&self, side: VerticalSide) -> &ArchProfile {
        match side {
            VerticalSide::Top => &self.top_arch,
            VerticalSide::Bottom => &self.bottom_arch,
        }
    }

    /// Highest point of the opening, arch ring included.
    pub fn top(&self) -> f64 {
        self.spring(VerticalSide::Top) + self.top_arch.outer_rise(self.width)
    }

    /// Lowest point of the opening, arch ring included.
    pub fn btm(&self) -> f64 {
        self.spring(VerticalSide::Bottom) - self.bottom_arch.outer_rise(self.width)
    }

    /// True when the opening's vertical extent overlaps `[zb, zt]`.
    pub fn overlaps_band(&self, zb: f64, zt: f64) -> bool {
        self.btm() < zt - EPSILON && self.top() > zb + EPSILON
    }

    /// Ordered heights at which the silhouette is discontinuous.
    ///
    /// Rows must break at these heights so no block straddles an
    /// arch/straight-side transition.
    pub fn crits(&self) -> Vec<f64> {
        let sb = self.spring(VerticalSide::Bottom);
        let st = self.spring(VerticalSide::Top);
        let mut out = vec![self.btm()];
        if self.bottom_arch.corner > EPSILON {
            out.push(sb - self.bottom_arch.corner);
        }
        out.push(sb);
        out.push(st);
        if self.top_arch.corner > EPSILON {
            out.push(st + self.top_arch.corner);
        }
        out.push(self.top());
        out.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
        out
    }

    /// Horizontal scale that converts the opening's real extents into
    /// domain units. Perimeter extents are already domain units.
    #[inline]
    fn horizontal_scale(&self, radius: f64) -> f64 {
        match self.kind {
            OpeningKind::Aperture => radius,
            OpeningKind::Perimeter => 1.0,
        }
    }

    /// Signed horizontal edge offset (domain units, relative to the
    /// opening center) at the given height.
    ///
    /// `None` outside `(btm(), top())` and for infeasible circle
    /// intercepts; callers substitute the center line.
    pub fn edge_s(&self, height: f64, side: Side, radius: f64) -> Option<f64> {
        if height <= self.btm() + EPSILON || height >= self.top() - EPSILON {
            return None;
        }
        let sb = self.spring(VerticalSide::Bottom);
        let st = self.spring(VerticalSide::Top);
        let half = if height >= sb && height <= st {
            Some(self.width / 2.0)
        } else if height > st {
            self.top_arch.half_extent_above(self.width, height - st)
        } else {
            self.bottom_arch.half_extent_above(self.width, sb - height)
        }?;
        Some(side.sign() * half / self.horizontal_scale(radius))
    }

    /// Vertical edge position of the head or sill silhouette at the
    /// real horizontal offset `dx` from the opening center.
    pub fn edge_v(&self, dx: f64, side: VerticalSide) -> Option<f64> {
        let arch = self.arch(side);
        if arch.shape == ArchShape::Flat && dx.abs() > self.width / 2.0 + EPSILON {
            return None;
        }
        let rise = arch.rise_at(self.width, dx)?;
        match side {
            VerticalSide::Top => Some(self.spring(VerticalSide::Top) + rise),
            VerticalSide::Bottom => Some(self.spring(VerticalSide::Bottom) - rise),
        }
    }

    /// Bevel distance (domain units) for heights strictly inside the
    /// straight vertical span, else 0. The kind sign points the
    /// chamfer into the masonry for apertures and out of the wall for
    /// the perimeter.
    pub fn edge_bevel(&self, height: f64, radius: f64) -> f64 {
        let sb = self.spring(VerticalSide::Bottom);
        let st = self.spring(VerticalSide::Top);
        if height > sb + EPSILON && height < st - EPSILON {
            self.bevel / radius
        } else {
            0.0
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(width: f64, height: f64) -> OpeningSpec {
        OpeningSpec {
            width,
            height,
            z: 5.0,
            ..OpeningSpec::default()
        }
    }

    fn arched(v_top: f64, t_top: f64, v_btm: f64, t_btm: f64) -> Opening {
        let spec = OpeningSpec {
            width: 2.0,
            height: 3.0,
            z: 5.0,
            arch_height_top: v_top,
            arch_thickness_top: t_top,
            arch_height_bottom: v_btm,
            arch_thickness_bottom: t_btm,
            ..OpeningSpec::default()
        };
        Opening::from_spec(&spec, 0.0)
    }

    #[test]
    fn test_width_clamped_positive() {
        let o = Opening::from_spec(&spec(-3.0, 2.0), 0.0);
        assert!(o.width > 0.0);
    }

    #[test]
    fn test_shape_selection() {
        // Rise at half-width is the semicircle boundary: pointed side.
        assert_eq!(ArchProfile::derive(1.0, 0.2, 2.0).shape, ArchShape::Pointed);
        assert_eq!(ArchProfile::derive(0.4, 0.2, 2.0).shape, ArchShape::Domed);
        assert_eq!(ArchProfile::derive(0.0, 0.2, 2.0).shape, ArchShape::Flat);
    }

    #[test]
    fn test_semicircle_radius_matches_both_formulas() {
        // At v = w/2 both derivations give the semicircle radius w/2.
        let pointed = ArchProfile::derive(1.0, 0.0, 2.0);
        assert!((pointed.radius - 1.0).abs() < 1e-12);
        let domed = ArchProfile::derive(1.0 - 1e-9, 0.0, 2.0);
        assert!((domed.radius - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric_opening_extents() {
        let o = arched(0.6, 0.25, 0.6, 0.25);
        assert!((o.top() - o.z - (o.z - o.btm())).abs() < 1e-12);
    }

    #[test]
    fn test_flat_extents_are_springs() {
        let o = arched(0.0, 0.0, 0.0, 0.0);
        assert_eq!(o.top(), 6.5);
        assert_eq!(o.btm(), 3.5);
    }

    #[test]
    fn test_edge_s_undefined_outside_extent() {
        let o = arched(0.6, 0.25, 0.0, 0.0);
        assert!(o.edge_s(o.btm() - 0.5, Side::Left, 1.0).is_none());
        assert!(o.edge_s(o.top() + 0.5, Side::Right, 1.0).is_none());
        // Defined strictly inside.
        let mid = (o.btm() + o.top()) / 2.0;
        assert!(o.edge_s(mid, Side::Left, 1.0).is_some());
    }

    #[test]
    fn test_edge_s_straight_band() {
        let o = arched(0.0, 0.0, 0.0, 0.0);
        let left = o.edge_s(5.0, Side::Left, 1.0).unwrap();
        let right = o.edge_s(5.0, Side::Right, 1.0).unwrap();
        assert!((left + 1.0).abs() < 1e-12);
        assert!((right - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_s_narrows_inside_domed_curve_band() {
        let o = arched(0.5, 0.2, 0.0, 0.0);
        let st = o.spring(VerticalSide::Top);
        let corner = o.top_arch.corner;
        assert!(corner > 0.0);
        // Transition band clips at the full footprint.
        let wide = o.edge_s(st + corner / 2.0, Side::Right, 1.0).unwrap();
        assert!((wide - o.top_arch.footprint(o.width)).abs() < 1e-12);
        // Curve band narrows toward the apex.
        let narrow = o.edge_s(o.top() - 1e-6, Side::Right, 1.0).unwrap();
        assert!(narrow < wide);
        assert!(narrow < 0.05);
    }

    #[test]
    fn test_edge_s_pointed_curve_band() {
        let o = arched(1.5, 0.2, 0.0, 0.0);
        let st = o.spring(VerticalSide::Top);
        // Just above the spring the ring sticks out by its thickness.
        let at_spring = o.edge_s(st + 1e-9, Side::Right, 1.0).unwrap();
        assert!((at_spring - (1.0 + 0.2)).abs() < 1e-4);
        // Near the outer apex the silhouette closes.
        let near_top = o.edge_s(o.top() - 1e-6, Side::Right, 1.0).unwrap();
        assert!(near_top < 0.05);
    }

    #[test]
    fn test_edge_s_radial_scaling() {
        let o = arched(0.0, 0.0, 0.0, 0.0);
        let flat = o.edge_s(5.0, Side::Right, 1.0).unwrap();
        let scaled = o.edge_s(5.0, Side::Right, 4.0).unwrap();
        assert!((flat / 4.0 - scaled).abs() < 1e-12);
    }

    #[test]
    fn test_edge_v_selects_form_like_construction() {
        let pointed = arched(1.5, 0.2, 0.0, 0.0);
        let apex = pointed.edge_v(0.0, VerticalSide::Top).unwrap();
        assert!((apex - pointed.top()).abs() < 1e-9);
        assert!(pointed.edge_v(1.5, VerticalSide::Top).is_none());

        let domed = arched(0.5, 0.2, 0.0, 0.0);
        let apex = domed.edge_v(0.0, VerticalSide::Top).unwrap();
        assert!((apex - domed.top()).abs() < 1e-9);

        let flat = arched(0.0, 0.0, 0.0, 0.0);
        assert_eq!(flat.edge_v(0.5, VerticalSide::Top), Some(6.5));
        assert!(flat.edge_v(1.5, VerticalSide::Top).is_none());
    }

    #[test]
    fn test_edge_bevel_only_inside_straight_span() {
        let spec = OpeningSpec {
            width: 2.0,
            height: 3.0,
            z: 5.0,
            bevel: 0.3,
            ..OpeningSpec::default()
        };
        let o = Opening::from_spec(&spec, 0.0);
        assert_eq!(o.edge_bevel(5.0, 1.0), 0.3);
        assert_eq!(o.edge_bevel(5.0, 2.0), 0.15);
        assert_eq!(o.edge_bevel(6.6, 1.0), 0.0);
        assert_eq!(o.edge_bevel(3.4, 1.0), 0.0);
    }

    #[test]
    fn test_crits_ordered_and_include_corners() {
        let o = arched(0.5, 0.2, 0.5, 0.2);
        let crits = o.crits();
        for pair in crits.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        let st = o.spring(VerticalSide::Top);
        assert!(crits
            .iter()
            .any(|c| (c - (st + o.top_arch.corner)).abs() < 1e-12));
    }

    #[test]
    fn test_perimeter_edges_are_wall_bounds() {
        let domain = WallDomain {
            start: -10.0,
            end: 10.0,
            bottom: 0.0,
            top: 8.0,
        };
        let wall = Opening::perimeter(&domain, 0.0);
        assert_eq!(wall.kind, OpeningKind::Perimeter);
        let left = wall.x + wall.edge_s(4.0, Side::Left, 3.0).unwrap();
        let right = wall.x + wall.edge_s(4.0, Side::Right, 3.0).unwrap();
        // Perimeter extents are domain units: no radial scaling.
        assert!((left - -10.0).abs() < 1e-12);
        assert!((right - 10.0).abs() < 1e-12);
    }
}
