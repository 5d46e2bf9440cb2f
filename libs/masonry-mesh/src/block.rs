//! # Block Mesh Synthesizer
//!
//! Emits the point/face pair for one rectangular block: subdivided
//! along its horizontal extent into boundary rings, with an optional
//! per-corner offset table interpolated across the rings.

use glam::DVec3;
use masonry_plan::divider::subdivide;
use masonry_plan::BlockSpec;

use crate::error::MeshError;
use crate::mesh::Mesh;

/// Appends one block to the mesh.
///
/// The block's horizontal extent is divided into segments no longer
/// than `max_subdivision` (`<= 0` disables subdivision); each division
/// boundary becomes a ring of 4 points ordered back-bottom,
/// front-bottom, front-top, back-top, with the left/right corner
/// offsets interpolated by horizontal fraction. Faces are the two end
/// caps plus 4 side quads per segment.
///
/// Guarantees: `4 * (divisions + 1)` points and `2 + 4 * divisions`
/// faces are appended.
///
/// # Example
///
/// ```rust
/// use masonry_mesh::{block::build_block, Mesh};
/// use masonry_plan::BlockSpec;
///
/// let mut mesh = Mesh::new();
/// let block = BlockSpec::new(5.0, 1.0, 10.0, 2.0, 1.0);
/// build_block(&mut mesh, &block, 3.0).unwrap();
/// assert_eq!(mesh.point_count(), 16); // 4 rings
/// assert_eq!(mesh.face_count(), 14); // 2 caps + 4 * 3 quads
/// ```
pub fn build_block(mesh: &mut Mesh, block: &BlockSpec, max_subdivision: f64) -> Result<(), MeshError> {
    if block.width <= 0.0 || block.height <= 0.0 || block.depth <= 0.0 {
        return Err(MeshError::degenerate(format!(
            "block extents must be positive: {} x {} x {}",
            block.width, block.height, block.depth
        )));
    }
    let left = block.left();
    let right = block.right();
    let bottom = block.bottom();
    let top = block.top();
    let back = block.y - block.depth / 2.0;
    let front = block.y + block.depth / 2.0;

    let zero = [DVec3::ZERO; 8];
    let corners = block.corners.as_ref().unwrap_or(&zero);
    let cuts = subdivide(left, right, max_subdivision);

    let base = mesh.point_count() as u32;
    for &x in &cuts {
        let t = (x - left) / block.width;
        for (i, (y, z)) in [(back, bottom), (front, bottom), (front, top), (back, top)]
            .into_iter()
            .enumerate()
        {
            let off = corners[i].lerp(corners[i + 4], t);
            mesh.add_point(DVec3::new(x + off.x, y + off.y, z + off.z));
        }
    }

    // End caps, wound for outward -x / +x normals.
    let last = base + 4 * (cuts.len() as u32 - 1);
    mesh.add_face(vec![base, base + 3, base + 2, base + 1]);
    mesh.add_face(vec![last + 1, last + 2, last + 3, last]);

    // One quad per segment per box edge.
    for i in 0..cuts.len() - 1 {
        let a = base + 4 * i as u32;
        let b = a + 4;
        mesh.add_face(vec![a, a + 1, b + 1, b]); // bottom
        mesh.add_face(vec![a + 1, a + 2, b + 2, b + 1]); // front
        mesh.add_face(vec![a + 3, b + 3, b + 2, a + 2]); // top
        mesh.add_face(vec![a, b, b + 3, a + 3]); // back
    }
    Ok(())
}
