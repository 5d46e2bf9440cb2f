//! # Configuration Constants
//!
//! Centralized constants for the masonry pipeline. Precision values,
//! clamp floors, and degenerate-geometry thresholds are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Clamp floors**: Smallest legal values for degenerate user input
//! - **Geometry guards**: Limits protecting curved-coordinate math

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon below which a polygon face counts as degenerate.
///
/// Used by mesh validation to reject zero-area faces produced by
/// collapsed corner offsets.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-12;

// =============================================================================
// CLAMP FLOORS
// =============================================================================

/// Smallest legal opening width.
///
/// A non-positive opening width is clamped here instead of rejected,
/// preserving generator availability over strict validation.
pub const MIN_OPENING_WIDTH: f64 = 1e-4;

/// Smallest legal wall span (horizontal or vertical).
///
/// Domain bounds with `end <= start` (or `top <= bottom`) are clamped
/// so the derived width/height stay positive.
pub const MIN_SPAN: f64 = 1e-3;

/// Smallest legal block dimension after variance and grout adjustments.
pub const MIN_BLOCK_DIMENSION: f64 = 1e-4;

// =============================================================================
// GEOMETRY GUARDS
// =============================================================================

/// Floor for the effective radius divisor in radial/sloped modes.
///
/// Horizontal distances are divided by the effective radius derived
/// from a point's height; rows at (or warped onto) the axis would
/// otherwise divide by zero.
pub const MIN_EFFECTIVE_RADIUS: f64 = 1e-3;

/// Smallest angular step when subdividing an arch span (radians).
///
/// Keeps voussoir counts finite when block width statistics are tiny
/// relative to the arc radius.
pub const MIN_ANGULAR_STEP: f64 = 1e-3;
