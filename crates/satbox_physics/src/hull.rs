//! Convex hull (polytope) collision shape
//!
//! A hull stores local-space vertices, faces with outward unit normals, and
//! the unique edge set derived from face topology. Construction validates the
//! geometry; a hull that fails validation never exists, so the narrow phase
//! can assume every hull it sees is convex and closed.

use satbox_math::{Pose, Vec3};
use std::collections::BTreeMap;
use std::fmt;

/// Faces below this Newell-area threshold are rejected as degenerate
const MIN_FACE_AREA: f32 = 1.0e-6;

/// Tolerance for the vertex-behind-face-plane convexity check
const CONVEXITY_SLOP: f32 = 1.0e-4;

/// A polygonal face of a convex hull
#[derive(Clone, Debug)]
pub struct Face {
    /// Ordered indices into the hull's vertex list
    pub indices: Vec<usize>,
    /// Outward unit normal
    pub normal: Vec3,
}

/// Error type for hull construction
#[derive(Debug)]
pub enum HullError {
    /// Fewer than 4 vertices cannot bound a 3D solid
    TooFewVertices(usize),
    /// A face listed fewer than 3 vertices
    ShortFace(usize),
    /// A face referenced a vertex index outside the vertex list
    IndexOutOfRange { face: usize, index: usize },
    /// A face has (near) zero area
    DegenerateFace(usize),
    /// Fewer than the 6 edges of a tetrahedral minimum
    TooFewEdges(usize),
    /// An edge is not shared by exactly two faces (hull is not closed)
    OpenEdge(usize, usize),
    /// A vertex lies outside a face plane (input is not convex)
    NotConvex { face: usize, vertex: usize },
}

impl fmt::Display for HullError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HullError::TooFewVertices(n) => {
                write!(f, "hull needs at least 4 vertices, got {}", n)
            }
            HullError::ShortFace(face) => {
                write!(f, "face {} has fewer than 3 vertices", face)
            }
            HullError::IndexOutOfRange { face, index } => {
                write!(f, "face {} references out-of-range vertex {}", face, index)
            }
            HullError::DegenerateFace(face) => {
                write!(f, "face {} has zero area", face)
            }
            HullError::TooFewEdges(n) => {
                write!(f, "hull needs at least 6 edges, got {}", n)
            }
            HullError::OpenEdge(a, b) => {
                write!(f, "edge ({}, {}) is not shared by exactly two faces", a, b)
            }
            HullError::NotConvex { face, vertex } => {
                write!(f, "vertex {} lies outside the plane of face {}", vertex, face)
            }
        }
    }
}

impl std::error::Error for HullError {}

/// A convex polytope in local space
///
/// Vertices, faces, and edges are stored in local coordinates. World-space
/// views are computed per query from the owning body's pose; nothing is
/// cached across ticks because the pose changes every tick.
#[derive(Clone, Debug)]
pub struct ConvexHull {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    /// Unique unordered vertex-index pairs, each stored as (low, high)
    edges: Vec<(usize, usize)>,
}

impl ConvexHull {
    /// Build a hull from local-space points and face index lists
    ///
    /// Face vertex order may wind either way; normals are computed by
    /// Newell's method and oriented outward against the hull centroid.
    /// The edge list is derived from the face topology.
    pub fn new(vertices: Vec<Vec3>, face_indices: Vec<Vec<usize>>) -> Result<Self, HullError> {
        if vertices.len() < 4 {
            return Err(HullError::TooFewVertices(vertices.len()));
        }

        let centroid = Self::centroid_of(&vertices);

        let mut faces = Vec::with_capacity(face_indices.len());
        for (fi, indices) in face_indices.into_iter().enumerate() {
            if indices.len() < 3 {
                return Err(HullError::ShortFace(fi));
            }
            for &index in &indices {
                if index >= vertices.len() {
                    return Err(HullError::IndexOutOfRange { face: fi, index });
                }
            }

            let newell = Self::newell_normal(&vertices, &indices);
            let area = 0.5 * newell.length();
            if area <= MIN_FACE_AREA {
                return Err(HullError::DegenerateFace(fi));
            }

            let mut normal = newell.normalized();
            let face_point = vertices[indices[0]];
            if normal.dot(face_point - centroid) < 0.0 {
                normal = -normal;
            }

            faces.push(Face { indices, normal });
        }

        // Count face membership per undirected edge; a closed hull has every
        // edge on exactly two faces
        let mut edge_counts: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for face in &faces {
            let n = face.indices.len();
            for i in 0..n {
                let a = face.indices[i];
                let b = face.indices[(i + 1) % n];
                let key = (a.min(b), a.max(b));
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }
        for (&(a, b), &count) in &edge_counts {
            if count != 2 {
                return Err(HullError::OpenEdge(a, b));
            }
        }
        let edges: Vec<(usize, usize)> = edge_counts.into_keys().collect();
        if edges.len() < 6 {
            return Err(HullError::TooFewEdges(edges.len()));
        }

        // Every vertex must lie on or behind every face plane
        for (fi, face) in faces.iter().enumerate() {
            let face_point = vertices[face.indices[0]];
            for (vi, &vertex) in vertices.iter().enumerate() {
                if face.normal.dot(vertex - face_point) > CONVEXITY_SLOP {
                    return Err(HullError::NotConvex { face: fi, vertex: vi });
                }
            }
        }

        Ok(Self {
            vertices,
            faces,
            edges,
        })
    }

    /// Build an axis-aligned box hull with the given half extents
    pub fn cuboid(half_extents: Vec3) -> Result<Self, HullError> {
        let h = half_extents;
        let vertices = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let faces = vec![
            vec![0, 3, 2, 1], // -Z
            vec![4, 5, 6, 7], // +Z
            vec![0, 1, 5, 4], // -Y
            vec![2, 3, 7, 6], // +Y
            vec![0, 4, 7, 3], // -X
            vec![1, 2, 6, 5], // +X
        ];
        Self::new(vertices, faces)
    }

    /// Local-space vertices
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces with outward unit normals
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Unique unordered edges as vertex-index pairs
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Local-space centroid (vertex average)
    pub fn centroid(&self) -> Vec3 {
        Self::centroid_of(&self.vertices)
    }

    /// Support mapping: the world-space vertex with maximum projection onto
    /// a world-space direction
    pub fn support(&self, pose: &Pose, direction: Vec3) -> Vec3 {
        // Pull the direction into local space so only one point is transformed
        let local_dir = pose.orientation.conjugate().rotate(direction);
        let mut best = self.vertices[0];
        let mut best_proj = best.dot(local_dir);
        for &vertex in &self.vertices[1..] {
            let proj = vertex.dot(local_dir);
            if proj > best_proj {
                best_proj = proj;
                best = vertex;
            }
        }
        pose.transform_point(best)
    }

    /// All vertices transformed into world space
    pub fn world_vertices(&self, pose: &Pose) -> Vec<Vec3> {
        self.vertices
            .iter()
            .map(|&v| pose.transform_point(v))
            .collect()
    }

    /// A face normal transformed into world space
    #[inline]
    pub fn world_face_normal(&self, pose: &Pose, face: usize) -> Vec3 {
        pose.transform_direction(self.faces[face].normal)
    }

    /// An edge's endpoints transformed into world space
    #[inline]
    pub fn world_edge(&self, pose: &Pose, edge: usize) -> (Vec3, Vec3) {
        let (a, b) = self.edges[edge];
        (
            pose.transform_point(self.vertices[a]),
            pose.transform_point(self.vertices[b]),
        )
    }

    /// The hull's projection interval onto a world-space axis
    pub fn projected_extent(&self, pose: &Pose, axis: Vec3) -> (f32, f32) {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &vertex in &self.vertices {
            let proj = pose.transform_point(vertex).dot(axis);
            min = min.min(proj);
            max = max.max(proj);
        }
        (min, max)
    }

    fn centroid_of(vertices: &[Vec3]) -> Vec3 {
        let mut sum = Vec3::ZERO;
        for &v in vertices {
            sum += v;
        }
        sum / vertices.len() as f32
    }

    fn newell_normal(vertices: &[Vec3], indices: &[usize]) -> Vec3 {
        let mut normal = Vec3::ZERO;
        for i in 0..indices.len() {
            let p = vertices[indices[i]];
            let q = vertices[indices[(i + 1) % indices.len()]];
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
        }
        normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use satbox_math::Quat;

    fn tetrahedron() -> Result<ConvexHull, HullError> {
        ConvexHull::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![
                vec![0, 1, 2],
                vec![0, 1, 3],
                vec![0, 2, 3],
                vec![1, 2, 3],
            ],
        )
    }

    #[test]
    fn test_cuboid_topology() {
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(hull.vertices().len(), 8);
        assert_eq!(hull.faces().len(), 6);
        assert_eq!(hull.edges().len(), 12);
    }

    #[test]
    fn test_tetrahedron_is_minimal_hull() {
        let hull = tetrahedron().unwrap();
        assert_eq!(hull.vertices().len(), 4);
        assert_eq!(hull.faces().len(), 4);
        assert_eq!(hull.edges().len(), 6);
    }

    #[test]
    fn test_face_normals_are_unit_and_outward() {
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let centroid = hull.centroid();
        for face in hull.faces() {
            assert!((face.normal.length() - 1.0).abs() < 0.0001);
            let face_point = hull.vertices()[face.indices[0]];
            assert!(face.normal.dot(face_point - centroid) > 0.0);
        }
    }

    #[test]
    fn test_rejects_too_few_vertices() {
        let result = ConvexHull::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![vec![0, 1, 2]],
        );
        assert!(matches!(result, Err(HullError::TooFewVertices(3))));
    }

    #[test]
    fn test_rejects_zero_area_face() {
        // Four collinear points on a face collapse its area to zero
        let result = ConvexHull::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![
                vec![0, 1, 2],
                vec![0, 1, 3],
                vec![0, 2, 3],
                vec![1, 2, 3],
            ],
        );
        assert!(matches!(result, Err(HullError::DegenerateFace(0))));
    }

    #[test]
    fn test_rejects_open_topology() {
        // A tetrahedron missing one face leaves three edges on a single face
        let result = ConvexHull::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ],
            vec![vec![0, 1, 2], vec![0, 1, 3], vec![0, 2, 3]],
        );
        assert!(matches!(result, Err(HullError::OpenEdge(_, _))));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let result = ConvexHull::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            vec![vec![0, 1, 9]],
        );
        assert!(matches!(
            result,
            Err(HullError::IndexOutOfRange { face: 0, index: 9 })
        ));
    }

    #[test]
    fn test_rejects_non_convex_input() {
        // A cuboid with one vertex pushed far outside its face planes
        let mut vertices = ConvexHull::cuboid(Vec3::new(1.0, 1.0, 1.0))
            .unwrap()
            .vertices()
            .to_vec();
        vertices[6] = Vec3::new(5.0, 5.0, 5.0);
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![0, 4, 7, 3],
            vec![1, 2, 6, 5],
        ];
        assert!(matches!(
            ConvexHull::new(vertices, faces),
            Err(HullError::NotConvex { .. })
        ));
    }

    #[test]
    fn test_support_axis_aligned() {
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let pose = Pose::identity();
        let support = hull.support(&pose, Vec3::X);
        assert!((support.x - 1.0).abs() < 0.0001);
        let support = hull.support(&pose, -Vec3::Y);
        assert!((support.y + 2.0).abs() < 0.0001);
    }

    #[test]
    fn test_support_follows_pose() {
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let pose = Pose::from_position(Vec3::new(10.0, 0.0, 0.0));
        let support = hull.support(&pose, Vec3::X);
        assert!((support.x - 11.0).abs() < 0.0001);
    }

    #[test]
    fn test_support_rotated() {
        // Rotating a unit cube 45 degrees about Z puts an edge at x = sqrt(2)
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let pose = Pose::new(
            Vec3::ZERO,
            Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_4),
        );
        let support = hull.support(&pose, Vec3::X);
        assert!((support.x - 2.0_f32.sqrt()).abs() < 0.001);
    }

    #[test]
    fn test_identity_pose_extent_round_trip() {
        let hull = ConvexHull::cuboid(Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let pose = Pose::identity();
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let (min, max) = hull.projected_extent(&pose, axis);
            let mut local_min = f32::INFINITY;
            let mut local_max = f32::NEG_INFINITY;
            for &v in hull.vertices() {
                local_min = local_min.min(v.dot(axis));
                local_max = local_max.max(v.dot(axis));
            }
            assert_eq!(min, local_min);
            assert_eq!(max, local_max);
        }
    }
}
