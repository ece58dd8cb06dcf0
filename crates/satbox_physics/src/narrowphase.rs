//! Narrow-phase collision detection
//!
//! Separating-axis test over convex polytopes: candidate axes are the face
//! normals of both hulls plus every edge-edge cross product. Any axis with
//! zero or negative projection overlap separates the pair (touching counts
//! as separated). If every axis overlaps, the axis of least penetration
//! picks the contact normal and the manifold is built by clipping the
//! incident face against the reference face (face axis) or from the closest
//! point pair between the two edges (edge axis).
//!
//! This is a pure function of two immutable world-space shapes: nothing is
//! mutated and nothing is cached across ticks.

use crate::collider::{Collider, ColliderKey, Shape};
use crate::contact::{ContactManifold, ContactPoint};
use crate::hull::ConvexHull;
use satbox_math::{Pose, Vec3};

/// Edge cross products shorter than this are parallel-edge degenerate axes
/// and are skipped before normalizing
const DEGENERATE_AXIS_EPSILON: f32 = 1.0e-6;

/// Overlaps within this margin of the running minimum count as ties;
/// ties prefer face axes over edge axes and the axis found first
const TIE_MARGIN: f32 = 1.0e-4;

/// Test one collider pair, emitting at most one manifold
///
/// This match is the pair-dispatch table keyed by shape kind: a future shape
/// variant adds arms here (or falls back to a generic support-mapping test)
/// without the step loop changing.
pub fn detect_collision(
    pair: (ColliderKey, ColliderKey),
    a: &Collider,
    pose_a: &Pose,
    b: &Collider,
    pose_b: &Pose,
) -> Option<ContactManifold> {
    match (&a.shape, &b.shape) {
        (Shape::Hull(hull_a), Shape::Hull(hull_b)) => {
            hull_vs_hull(hull_a, pose_a, hull_b, pose_b)
                .map(|(normal, points)| ContactManifold::new(pair, normal, points))
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FaceCandidate {
    axis: Vec3,
    overlap: f32,
    /// Which hull the face belongs to
    from_a: bool,
}

#[derive(Clone, Copy, Debug)]
struct EdgeCandidate {
    axis: Vec3,
    overlap: f32,
    edge_a: usize,
    edge_b: usize,
    /// Distance between the two edges' closest points. Several edge pairs
    /// can share a cross-product direction and therefore the same interval
    /// overlap; the physically touching pair is the one whose edges are
    /// closest.
    gap: f32,
}

/// SAT test between two hulls; returns the shared normal (oriented from A
/// toward B) and the contact points
fn hull_vs_hull(
    hull_a: &ConvexHull,
    pose_a: &Pose,
    hull_b: &ConvexHull,
    pose_b: &Pose,
) -> Option<(Vec3, Vec<ContactPoint>)> {
    let verts_a = hull_a.world_vertices(pose_a);
    let verts_b = hull_b.world_vertices(pose_b);

    // Face axes first; the first face axis at the minimum wins ties
    let mut best_face: Option<FaceCandidate> = None;
    for i in 0..hull_a.faces().len() {
        let axis = hull_a.world_face_normal(pose_a, i);
        let overlap = axis_overlap(&verts_a, &verts_b, axis)?;
        if best_face.map_or(true, |f| overlap < f.overlap - TIE_MARGIN) {
            best_face = Some(FaceCandidate {
                axis,
                overlap,
                from_a: true,
            });
        }
    }
    for i in 0..hull_b.faces().len() {
        let axis = hull_b.world_face_normal(pose_b, i);
        let overlap = axis_overlap(&verts_a, &verts_b, axis)?;
        if best_face.map_or(true, |f| overlap < f.overlap - TIE_MARGIN) {
            best_face = Some(FaceCandidate {
                axis,
                overlap,
                from_a: false,
            });
        }
    }

    let mut best_edge: Option<EdgeCandidate> = None;
    for ia in 0..hull_a.edges().len() {
        let (a0, a1) = hull_a.world_edge(pose_a, ia);
        let dir_a = a1 - a0;
        for ib in 0..hull_b.edges().len() {
            let (b0, b1) = hull_b.world_edge(pose_b, ib);
            let cross = dir_a.cross(b1 - b0);
            if cross.length() < DEGENERATE_AXIS_EPSILON {
                // Parallel edges; at least one non-degenerate axis always
                // remains for hulls in general position
                continue;
            }
            let axis = cross.normalized();
            let overlap = axis_overlap(&verts_a, &verts_b, axis)?;

            let improves = match best_edge {
                None => true,
                Some(best) => {
                    if overlap < best.overlap - TIE_MARGIN {
                        true
                    } else if overlap <= best.overlap + TIE_MARGIN {
                        // Same overlap: pick the pair whose edges actually meet
                        edge_gap(a0, a1, b0, b1) < best.gap - TIE_MARGIN
                    } else {
                        false
                    }
                }
            };
            if improves {
                best_edge = Some(EdgeCandidate {
                    axis,
                    overlap,
                    edge_a: ia,
                    edge_b: ib,
                    gap: edge_gap(a0, a1, b0, b1),
                });
            }
        }
    }

    // Faces of a closed hull always yield at least one candidate
    let face = best_face?;

    // Shared manifold normal points from A toward B
    let center_a = pose_a.transform_point(hull_a.centroid());
    let center_b = pose_b.transform_point(hull_b.centroid());
    let to_b = center_b - center_a;

    let (normal, points) = match best_edge {
        // The edge axis wins only on a strict margin; ties go to the face
        Some(edge) if edge.overlap < face.overlap - TIE_MARGIN => {
            let mut normal = edge.axis;
            if normal.dot(to_b) < 0.0 {
                normal = -normal;
            }
            let (a0, a1) = hull_a.world_edge(pose_a, edge.edge_a);
            let (b0, b1) = hull_b.world_edge(pose_b, edge.edge_b);
            let (on_a, on_b) = closest_points_between_segments(a0, a1, b0, b1);
            let point = ContactPoint::new((on_a + on_b) * 0.5, edge.overlap);
            (normal, vec![point])
        }
        _ => {
            let mut normal = face.axis;
            if normal.dot(to_b) < 0.0 {
                normal = -normal;
            }
            // Antipodal faces project the same interval, so the reference
            // face is re-selected as the source hull's face best aligned
            // with the oriented axis: for A the face looking toward B, for
            // B the face looking back toward A.
            let points = if face.from_a {
                let (_, ref_face) = most_aligned_face(hull_a, pose_a, normal);
                clip_face_manifold(hull_a, pose_a, ref_face, hull_b, pose_b)
            } else {
                let (_, ref_face) = most_aligned_face(hull_b, pose_b, -normal);
                clip_face_manifold(hull_b, pose_b, ref_face, hull_a, pose_a)
            };
            (normal, points)
        }
    };

    if points.is_empty() {
        // Grazing contact: SAT saw overlap but no clipped point actually
        // penetrates the reference face
        return None;
    }

    Some((normal, points))
}

/// Projection overlap of two vertex sets on an axis; None means separated
fn axis_overlap(verts_a: &[Vec3], verts_b: &[Vec3], axis: Vec3) -> Option<f32> {
    let (min_a, max_a) = project_onto(verts_a, axis);
    let (min_b, max_b) = project_onto(verts_b, axis);
    let overlap = max_a.min(max_b) - min_a.max(min_b);
    // Touching (zero overlap) counts as separated
    if overlap > 0.0 {
        Some(overlap)
    } else {
        None
    }
}

fn project_onto(verts: &[Vec3], axis: Vec3) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in verts {
        let proj = v.dot(axis);
        min = min.min(proj);
        max = max.max(proj);
    }
    (min, max)
}

/// Distance between the closest points of two segments
fn edge_gap(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> f32 {
    let (on_a, on_b) = closest_points_between_segments(p1, q1, p2, q2);
    (on_b - on_a).length()
}

/// The face whose world normal is most aligned with a direction
fn most_aligned_face(hull: &ConvexHull, pose: &Pose, direction: Vec3) -> (f32, usize) {
    let mut best = (f32::NEG_INFINITY, 0);
    for i in 0..hull.faces().len() {
        let alignment = hull.world_face_normal(pose, i).dot(direction);
        if alignment > best.0 {
            best = (alignment, i);
        }
    }
    best
}

/// Build contact points by clipping the incident face against the reference
/// face's side planes, keeping points that penetrate the reference plane
fn clip_face_manifold(
    reference: &ConvexHull,
    ref_pose: &Pose,
    ref_face: usize,
    incident: &ConvexHull,
    inc_pose: &Pose,
) -> Vec<ContactPoint> {
    let ref_normal = reference.world_face_normal(ref_pose, ref_face);

    // Incident face: the one most anti-parallel to the reference normal
    let (_, inc_face) = most_aligned_face(incident, inc_pose, -ref_normal);

    let ref_polygon = face_polygon(reference, ref_pose, ref_face);
    let mut polygon = face_polygon(incident, inc_pose, inc_face);

    // Clip against the side planes spanned by each reference-face edge
    let ref_center = polygon_center(&ref_polygon);
    let n = ref_polygon.len();
    for i in 0..n {
        let edge_start = ref_polygon[i];
        let edge = ref_polygon[(i + 1) % n] - edge_start;
        let mut side_normal = ref_normal.cross(edge);
        if side_normal.dot(ref_center - edge_start) < 0.0 {
            side_normal = -side_normal;
        }
        polygon = clip_polygon(&polygon, edge_start, side_normal);
        if polygon.is_empty() {
            return Vec::new();
        }
    }

    // Signed distance below the reference plane is the penetration depth;
    // points above the plane are not actually penetrating
    let ref_point = ref_polygon[0];
    let mut points: Vec<ContactPoint> = polygon
        .into_iter()
        .filter_map(|p| {
            let depth = -ref_normal.dot(p - ref_point);
            (depth > 0.0).then(|| ContactPoint::new(p, depth))
        })
        .collect();

    // A manifold carries at most 4 points; keep the deepest
    if points.len() > 4 {
        points.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        points.truncate(4);
    }
    points
}

fn face_polygon(hull: &ConvexHull, pose: &Pose, face: usize) -> Vec<Vec3> {
    hull.faces()[face]
        .indices
        .iter()
        .map(|&i| pose.transform_point(hull.vertices()[i]))
        .collect()
}

fn polygon_center(polygon: &[Vec3]) -> Vec3 {
    let mut sum = Vec3::ZERO;
    for &p in polygon {
        sum += p;
    }
    sum / polygon.len() as f32
}

/// One Sutherland-Hodgman step: keep the polygon on the positive side of the
/// plane, inserting intersection points where edges cross it
fn clip_polygon(polygon: &[Vec3], plane_point: Vec3, plane_normal: Vec3) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];
        let dist_current = plane_normal.dot(current - plane_point);
        let dist_next = plane_normal.dot(next - plane_point);

        if dist_current >= 0.0 {
            out.push(current);
        }
        if (dist_current > 0.0) != (dist_next > 0.0) && dist_current != dist_next {
            let t = dist_current / (dist_current - dist_next);
            out.push(current.lerp(next, t));
        }
    }
    out
}

/// Closest points between two segments (clamped to both segments)
fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);

    // Hull edges always have positive length, so a and e are nonzero
    let denom = a * e - b * b;
    let mut s = if denom > 1.0e-8 {
        ((b * f - c * e) / denom).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }
    (p1 + d1 * s, p2 + d2 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use satbox_math::Quat;
    use std::f32::consts::FRAC_PI_4;

    fn unit_cube() -> ConvexHull {
        ConvexHull::cuboid(Vec3::new(1.0, 1.0, 1.0)).unwrap()
    }

    fn at(x: f32, y: f32, z: f32) -> Pose {
        Pose::from_position(Vec3::new(x, y, z))
    }

    #[test]
    fn test_touching_cubes_do_not_collide() {
        // A spans x in [-1, 1], B spans x in [1, 3]: boundary contact only
        let cube = unit_cube();
        let result = hull_vs_hull(&cube, &at(0.0, 0.0, 0.0), &cube, &at(2.0, 0.0, 0.0));
        assert!(result.is_none());
    }

    #[test]
    fn test_separated_cubes_do_not_collide() {
        let cube = unit_cube();
        let result = hull_vs_hull(&cube, &at(0.0, 0.0, 0.0), &cube, &at(5.0, 2.0, 0.0));
        assert!(result.is_none());
    }

    #[test]
    fn test_overlapping_cubes_produce_face_manifold() {
        // A spans x in [-1, 1], B spans x in [0.8, 2.8]: 0.2 overlap on x
        let cube = unit_cube();
        let (normal, points) = hull_vs_hull(
            &cube,
            &at(0.0, 0.0, 0.0),
            &cube,
            &at(1.8, 0.0, 0.0),
        )
        .expect("cubes overlap");

        assert!((normal - Vec3::X).length() < 0.0001);
        assert_eq!(points.len(), 4);
        for point in &points {
            assert!((point.depth - 0.2).abs() < 0.0001);
            // Contacts lie on the incident face plane at x = 0.8
            assert!((point.position.x - 0.8).abs() < 0.0001);
        }
    }

    #[test]
    fn test_contact_normal_is_unit() {
        let cube = unit_cube();
        let pose_b = Pose::new(
            Vec3::new(1.2, 0.7, 0.3),
            Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0), 0.5),
        );
        let (normal, _) = hull_vs_hull(&cube, &at(0.0, 0.0, 0.0), &cube, &pose_b)
            .expect("cubes overlap");
        assert!((normal.length() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_least_penetration_axis() {
        // Depth must not exceed the overlap on any other candidate axis
        let cube = unit_cube();
        let pose_a = at(0.0, 0.0, 0.0);
        let pose_b = Pose::new(
            Vec3::new(1.1, 0.9, 0.0),
            Quat::from_axis_angle(Vec3::Z, 0.3),
        );
        let (_, points) = hull_vs_hull(&cube, &pose_a, &cube, &pose_b).expect("cubes overlap");
        let depth = points.iter().fold(0.0_f32, |acc, p| acc.max(p.depth));

        let verts_a = cube.world_vertices(&pose_a);
        let verts_b = cube.world_vertices(&pose_b);
        let mut axes = Vec::new();
        for i in 0..cube.faces().len() {
            axes.push(cube.world_face_normal(&pose_a, i));
            axes.push(cube.world_face_normal(&pose_b, i));
        }
        for ia in 0..cube.edges().len() {
            let (a0, a1) = cube.world_edge(&pose_a, ia);
            for ib in 0..cube.edges().len() {
                let (b0, b1) = cube.world_edge(&pose_b, ib);
                let cross = (a1 - a0).cross(b1 - b0);
                if cross.length() >= DEGENERATE_AXIS_EPSILON {
                    axes.push(cross.normalized());
                }
            }
        }
        for axis in axes {
            let overlap = axis_overlap(&verts_a, &verts_b, axis).expect("all axes overlap");
            assert!(depth <= overlap + TIE_MARGIN * 2.0);
        }
    }

    #[test]
    fn test_tilted_box_resting_on_slab_touches_on_edge() {
        // A 45-degree box over a slab penetrates along its lowest edge:
        // 1 or 2 contact points, not a full face's 4
        let slab = ConvexHull::cuboid(Vec3::new(5.0, 1.0, 5.0)).unwrap();
        let box_hull = unit_cube();
        let slab_pose = at(0.0, -1.0, 0.0); // top face at y = 0
        let box_pose = Pose::new(
            Vec3::new(0.0, 1.35, 0.0), // lowest edge at y = 1.35 - sqrt(2)
            Quat::from_axis_angle(Vec3::Z, FRAC_PI_4),
        );

        let (normal, points) =
            hull_vs_hull(&slab, &slab_pose, &box_hull, &box_pose).expect("box grazes slab");

        assert!((normal - Vec3::Y).length() < 0.0001);
        assert!(!points.is_empty() && points.len() <= 2);
        let expected_depth = 2.0_f32.sqrt() - 1.35;
        for point in &points {
            assert!((point.depth - expected_depth).abs() < 0.001);
        }
    }

    #[test]
    fn test_crossed_knife_edges_produce_single_point() {
        // A rotated 45 degrees about Z has a vertical knife edge at x=sqrt(2);
        // B rotated 45 degrees about Y has a knife edge along Y. Offset so the
        // edges cross with 0.1 of overlap along X: a pure edge-edge contact.
        let cube = unit_cube();
        let pose_a = Pose::new(Vec3::ZERO, Quat::from_axis_angle(Vec3::Z, FRAC_PI_4));
        let center_b = 2.0 * 2.0_f32.sqrt() - 0.1;
        let pose_b = Pose::new(
            Vec3::new(center_b, 0.0, 0.0),
            Quat::from_axis_angle(Vec3::Y, FRAC_PI_4),
        );

        let (normal, points) =
            hull_vs_hull(&cube, &pose_a, &cube, &pose_b).expect("edges cross");

        assert!((normal - Vec3::X).length() < 0.001);
        assert_eq!(points.len(), 1);
        assert!((points[0].depth - 0.1).abs() < 0.001);
        // Contact sits midway between the two edges
        let expected = Vec3::new(2.0_f32.sqrt() - 0.05, 0.0, 0.0);
        assert!((points[0].position - expected).length() < 0.01);
    }

    #[test]
    fn test_deep_overlap_prefers_smallest_escape() {
        // B offset mostly along y: the y face axis has the least overlap
        let cube = unit_cube();
        let (normal, points) = hull_vs_hull(
            &cube,
            &at(0.0, 0.0, 0.0),
            &cube,
            &at(0.3, 1.5, 0.0),
        )
        .expect("cubes overlap");
        assert!((normal - Vec3::Y).length() < 0.0001);
        for point in &points {
            assert!((point.depth - 0.5).abs() < 0.0001);
        }
    }

    #[test]
    fn test_reference_face_faces_the_other_hull() {
        // Same configuration probed in both argument orders: the normal
        // always points from the first hull toward the second
        let cube = unit_cube();
        let (normal_ab, _) =
            hull_vs_hull(&cube, &at(0.0, 0.0, 0.0), &cube, &at(1.8, 0.0, 0.0)).unwrap();
        let (normal_ba, _) =
            hull_vs_hull(&cube, &at(1.8, 0.0, 0.0), &cube, &at(0.0, 0.0, 0.0)).unwrap();
        assert!((normal_ab - Vec3::X).length() < 0.0001);
        assert!((normal_ba + Vec3::X).length() < 0.0001);
    }

    #[test]
    fn test_dispatch_emits_manifold_with_pair_keys() {
        use crate::collider::Collider;
        let a = Collider::hull(unit_cube());
        let b = Collider::hull(unit_cube());
        let pair = (ColliderKey::default(), ColliderKey::default());
        let manifold = detect_collision(
            pair,
            &a,
            &at(0.0, 0.0, 0.0),
            &b,
            &at(1.8, 0.0, 0.0),
        )
        .expect("cubes overlap");
        assert_eq!(manifold.pair, pair);
        assert_eq!(manifold.points.len(), 4);
        assert!((manifold.normal.length() - 1.0).abs() < 0.0001);
    }
}
