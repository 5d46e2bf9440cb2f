//! # Masonry Mesh
//!
//! Mesh synthesis for planned masonry walls.
//!
//! ## Architecture
//!
//! ```text
//! masonry-plan (WallPlan) → masonry-mesh (Mesh)
//! ```
//!
//! The plan crate owns all randomness; this crate deterministically
//! turns its block, arch and keystone records into point/face buffers
//! and applies the radial/sloped coordinate warps.
//!
//! ## Usage
//!
//! ```rust
//! use masonry_mesh::generate;
//! use masonry_plan::WallSpec;
//!
//! let mesh = generate(&WallSpec::default()).unwrap();
//! assert!(!mesh.is_empty());
//! ```

pub mod arch;
pub mod block;
pub mod error;
pub mod from_plan;
pub mod mesh;
pub mod warp;

pub use error::MeshError;
pub use mesh::Mesh;

/// Generates the mesh for one wall specification.
///
/// This is the main entry point for the masonry pipeline: it plans
/// the layout and synthesizes every planned record. Degenerate
/// records degrade to logged skips; no documented input combination
/// returns an error.
///
/// # Example
///
/// ```rust
/// use masonry_mesh::generate;
/// use masonry_plan::{OpeningSpec, WallSpec};
///
/// let spec = WallSpec {
///     openings: vec![OpeningSpec::default()],
///     ..WallSpec::default()
/// };
/// let mesh = generate(&spec).unwrap();
/// assert!(mesh.validate());
/// ```
pub fn generate(spec: &masonry_plan::WallSpec) -> Result<Mesh, MeshError> {
    let plan = masonry_plan::plan(spec);
    for warning in &plan.warnings {
        tracing::debug!("plan warning: {warning}");
    }
    from_plan::plan_to_mesh(&plan)
}

// =============================================================================
// TESTS
// =============================================================================
