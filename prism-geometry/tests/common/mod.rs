//! Topology helpers shared by the geometry integration tests.

use std::collections::HashMap;

use glam::Vec3;
use prism_geometry::MeshDescription;

const WELD_EPSILON: f32 = 1e-4;

/// Maps every vertex to the first vertex at the same position, so seam and
/// cap duplicates collapse onto one topological vertex.
pub fn weld(mesh: &MeshDescription) -> Vec<usize> {
    let mut representatives: Vec<(usize, Vec3)> = Vec::new();
    mesh.vertices
        .iter()
        .map(|vertex| {
            let p = vertex.position();
            match representatives.iter().find(|(_, q)| q.distance(p) < WELD_EPSILON) {
                Some(&(id, _)) => id,
                None => {
                    let id = representatives.len();
                    representatives.push((id, p));
                    id
                }
            }
        })
        .collect()
}

/// Directed edge counts of the welded mesh, skipping edges collapsed by welding.
pub fn directed_edges(mesh: &MeshDescription) -> HashMap<(usize, usize), usize> {
    let ids = weld(mesh);
    let mut edges = HashMap::new();
    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| ids[i as usize]);
        for (from, to) in [(a, b), (b, c), (c, a)] {
            if from != to {
                *edges.entry((from, to)).or_insert(0) += 1;
            }
        }
    }
    edges
}

/// Edges used by exactly one triangle.
pub fn boundary_edges(mesh: &MeshDescription) -> usize {
    let edges = directed_edges(mesh);
    let mut undirected: HashMap<(usize, usize), usize> = HashMap::new();
    for (&(a, b), &count) in &edges {
        *undirected.entry((a.min(b), a.max(b))).or_insert(0) += count;
    }
    undirected.values().filter(|&&count| count == 1).count()
}

/// True when no directed edge repeats, i.e. neighbouring triangles agree on orientation.
pub fn consistently_oriented(mesh: &MeshDescription) -> bool {
    directed_edges(mesh).values().all(|&count| count == 1)
}

/// Every non-degenerate triangle's geometric normal agrees with its vertex normals.
pub fn winding_matches_normals(mesh: &MeshDescription) -> bool {
    mesh.triangles().all(|[a, b, c]| {
        let [va, vb, vc] = [a, b, c].map(|i| mesh.vertices[i as usize]);
        let face = (vb.position() - va.position()).cross(vc.position() - va.position());
        if face.length_squared() < 1e-12 {
            return true;
        }
        let normal = va.normal() + vb.normal() + vc.normal();
        face.dot(normal) > 0.0
    })
}
