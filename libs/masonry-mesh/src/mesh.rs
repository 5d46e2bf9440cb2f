//! # Mesh Data Structure
//!
//! Polygonal mesh representation: an ordered point list plus faces as
//! CCW index loops. Both buffers are append-only during generation.

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::DVec3;

/// A polygon mesh with points and face index loops.
///
/// All geometry calculations use f64 internally. Export to f32 only
/// happens at the consumer boundary for GPU-style rendering.
///
/// # Example
///
/// ```rust
/// use masonry_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_point(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_point(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_face(vec![0, 1, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Point positions (f64 for precision)
    points: Vec<DVec3>,
    /// Faces as CCW loops of point indices
    faces: Vec<Vec<u32>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(point_count: usize, face_count: usize) -> Self {
        Self {
            points: Vec::with_capacity(point_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Returns the number of points.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Adds a point and returns its index.
    pub fn add_point(&mut self, position: DVec3) -> u32 {
        let index = self.points.len() as u32;
        self.points.push(position);
        index
    }

    /// Adds a face as a loop of point indices.
    pub fn add_face(&mut self, indices: Vec<u32>) {
        self.faces.push(indices);
    }

    /// Returns a reference to the points.
    #[inline]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Returns a reference to the faces.
    #[inline]
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Returns the point at the given index.
    #[inline]
    pub fn point(&self, index: u32) -> DVec3 {
        self.points[index as usize]
    }

    /// Applies a coordinate mapping to every point.
    pub fn map_points(&mut self, f: impl Fn(DVec3) -> DVec3) {
        for p in &mut self.points {
            *p = f(*p);
        }
    }

    /// Translates the mesh by a vector.
    pub fn translate(&mut self, offset: DVec3) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Merges another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.points.len() as u32;
        self.points.extend_from_slice(&other.points);
        for face in &other.faces {
            self.faces.push(face.iter().map(|i| i + offset).collect());
        }
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.points.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }
        let mut min = self.points[0];
        let mut max = self.points[0];
        for p in &self.points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        (min, max)
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All face indices are valid
    /// - Every face has at least 3 distinct vertices
    /// - No zero-area faces (Newell normal)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let point_count = self.points.len() as u32;
        for face in &self.faces {
            if face.len() < 3 {
                return false;
            }
            if face.iter().any(|&i| i >= point_count) {
                return false;
            }
            for (k, &i) in face.iter().enumerate() {
                if face[k + 1..].contains(&i) {
                    return false;
                }
            }
            if self.face_normal(face).length() < DEGENERATE_AREA_EPSILON {
                return false;
            }
        }
        true
    }

    /// Newell normal of a face loop (length is twice the face area).
    fn face_normal(&self, face: &[u32]) -> DVec3 {
        let mut normal = DVec3::ZERO;
        for (k, &i) in face.iter().enumerate() {
            let a = self.points[i as usize];
            let b = self.points[face[(k + 1) % face.len()] as usize];
            normal += DVec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            );
        }
        normal
    }

    /// Exports points as f32 array for GPU-style consumers.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn points_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.points.len() * 3);
        for p in &self.points {
            result.push(p.x as f32);
            result.push(p.y as f32);
            result.push(p.z as f32);
        }
        result
    }

    /// Exports face loops as flattened u32 index runs with a parallel
    /// loop-length array.
    pub fn face_indices(&self) -> (Vec<u32>, Vec<u32>) {
        let mut indices = Vec::new();
        let mut lengths = Vec::with_capacity(self.faces.len());
        for face in &self.faces {
            indices.extend_from_slice(face);
            lengths.push(face.len() as u32);
        }
        (indices, lengths)
    }
}
