//! Delaunay triangulation over integer points.
//!
//! Bowyer–Watson insertion with a symbolic vertex at infinity: every hull edge
//! carries a ghost triangle, so points outside the current hull are inserted
//! without a finite super-triangle. Predicates run in exact integer
//! arithmetic, which keeps cocircular grid points from producing broken or
//! missing edges. Point counts during map generation are around a thousand, so
//! the quadratic conflict scan is fine.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use glam::IVec2;

/// Stands in for the vertex at infinity. Always stored in slot 2.
const GHOST: usize = usize::MAX;

/// Twice the signed area of `abc`. Positive when `a → b → c` turns
/// counter-clockwise in a y-up frame.
fn cross(a: IVec2, b: IVec2, c: IVec2) -> i64 {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    (i64::from(b.x) - ax) * (i64::from(c.y) - ay) - (i64::from(b.y) - ay) * (i64::from(c.x) - ax)
}

/// Whether `p` lies strictly inside the circumcircle of the positively
/// oriented triangle `abc`.
fn in_circle(a: IVec2, b: IVec2, c: IVec2, p: IVec2) -> bool {
    let row = |q: IVec2| {
        let dx = i128::from(q.x) - i128::from(p.x);
        let dy = i128::from(q.y) - i128::from(p.y);
        (dx, dy, dx * dx + dy * dy)
    };
    let (ax, ay, a2) = row(a);
    let (bx, by, b2) = row(b);
    let (cx, cy, c2) = row(c);
    let det = ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx);
    det > 0
}

/// Whether collinear `p` lies strictly between `a` and `b`.
fn strictly_between(a: IVec2, b: IVec2, p: IVec2) -> bool {
    let ab = (b - a).as_i64vec2();
    (p - a).as_i64vec2().dot(ab) > 0 && (p - b).as_i64vec2().dot(-ab) > 0
}

/// Rotate a triangle so the ghost vertex, if any, sits in slot 2.
fn canonical(t: [usize; 3]) -> [usize; 3] {
    if t[0] == GHOST {
        [t[1], t[2], t[0]]
    } else if t[1] == GHOST {
        [t[2], t[0], t[1]]
    } else {
        t
    }
}

/// Delaunay triangulation of a point set.
///
/// Triangles are stored flat, three vertex indices each, all with positive
/// orientation. `halfedges[e]` is the opposite half-edge of `e`, where
/// half-edge `e` runs from `triangles[e]` to `triangles[next(e)]`.
#[derive(Debug, Clone, Default)]
pub struct Triangulation {
    points: Vec<IVec2>,
    triangles: Vec<usize>,
    halfedges: Vec<Option<usize>>,
    hull: Vec<usize>,
    adjacency: Vec<Vec<usize>>,
}

impl Triangulation {
    /// Triangulate `points`.
    ///
    /// Fewer than three distinct points, or an all-collinear set, produce no
    /// triangles. Duplicate points are kept in the point list but never
    /// become triangle vertices.
    #[must_use]
    pub fn new(points: &[IVec2]) -> Self {
        let mut result = Self {
            points: points.to_vec(),
            adjacency: vec![Vec::new(); points.len()],
            ..Self::default()
        };
        if points.len() < 3 {
            return result;
        }

        result.triangulate();
        result.link_halfedges();
        result.build_adjacency();
        result.hull = convex_hull(points);
        result
    }

    fn triangulate(&mut self) {
        let pts = &self.points;
        let Some((a, b, c)) = initial_triangle(pts) else {
            return;
        };
        let (b, c) = if cross(pts[a], pts[b], pts[c]) > 0 { (b, c) } else { (c, b) };

        let mut working = vec![[a, b, c], [b, a, GHOST], [c, b, GHOST], [a, c, GHOST]];
        let mut seen: HashSet<IVec2> = [pts[a], pts[b], pts[c]].into_iter().collect();

        let conflicts = |t: &[usize; 3], p: IVec2| {
            if t[2] == GHOST {
                let (u, v) = (pts[t[0]], pts[t[1]]);
                let side = cross(u, v, p);
                side > 0 || (side == 0 && strictly_between(u, v, p))
            } else {
                in_circle(pts[t[0]], pts[t[1]], pts[t[2]], p)
            }
        };

        for (i, &p) in pts.iter().enumerate() {
            if !seen.insert(p) {
                continue;
            }

            // Undirected edge -> directed edge if it borders exactly one removed triangle.
            // Ordered so the new fan comes out the same on every run.
            let mut cavity: BTreeMap<(usize, usize), Option<(usize, usize)>> = BTreeMap::new();
            working.retain(|t| {
                if !conflicts(t, p) {
                    return true;
                }
                for k in 0..3 {
                    let (u, v) = (t[k], t[(k + 1) % 3]);
                    match cavity.entry((u.min(v), u.max(v))) {
                        Entry::Vacant(slot) => {
                            slot.insert(Some((u, v)));
                        }
                        Entry::Occupied(mut slot) => {
                            slot.insert(None);
                        }
                    }
                }
                false
            });

            working.extend(
                cavity
                    .into_values()
                    .flatten()
                    .map(|(u, v)| canonical([u, v, i])),
            );
        }

        self.triangles = working
            .iter()
            .filter(|t| t[2] != GHOST)
            .flat_map(|t| *t)
            .collect();
    }

    fn link_halfedges(&mut self) {
        let mut by_edge = HashMap::with_capacity(self.triangles.len());
        for e in 0..self.triangles.len() {
            by_edge.insert((self.triangles[e], self.triangles[next_halfedge(e)]), e);
        }
        self.halfedges = (0..self.triangles.len())
            .map(|e| {
                let (a, b) = (self.triangles[e], self.triangles[next_halfedge(e)]);
                by_edge.get(&(b, a)).copied()
            })
            .collect();
    }

    fn build_adjacency(&mut self) {
        let edges: Vec<_> = self.edges().collect();
        for (a, b) in edges {
            self.adjacency[a].push(b);
            self.adjacency[b].push(a);
        }
        for list in &mut self.adjacency {
            list.sort_unstable();
            list.dedup();
        }
    }

    /// The input points.
    #[must_use]
    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    /// Flat vertex indices, three per triangle.
    #[must_use]
    pub fn triangles(&self) -> &[usize] {
        &self.triangles
    }

    /// Opposite half-edge for each half-edge, `None` on the outer boundary.
    #[must_use]
    pub fn halfedges(&self) -> &[Option<usize>] {
        &self.halfedges
    }

    /// Convex hull vertex indices in counter-clockwise order (y-up frame),
    /// without collinear points.
    #[must_use]
    pub fn hull(&self) -> &[usize] {
        &self.hull
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Point indices sharing a triangle edge with `i`, sorted.
    #[must_use]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.adjacency.get(i).map_or(&[], Vec::as_slice)
    }

    /// Each undirected edge once, as point index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.triangles.len()).filter_map(move |e| match self.halfedges.get(e) {
            Some(Some(twin)) if *twin < e => None,
            _ => Some((self.triangles[e], self.triangles[next_halfedge(e)])),
        })
    }
}

/// The first point, the first point distinct from it, and the first point off
/// the line through both. `None` for degenerate input.
fn initial_triangle(points: &[IVec2]) -> Option<(usize, usize, usize)> {
    let a = 0;
    let b = points.iter().position(|&p| p != points[a])?;
    let c = points
        .iter()
        .position(|&p| cross(points[a], points[b], p) != 0)?;
    Some((a, b, c))
}

/// Index of the next half-edge within the same triangle.
#[must_use]
#[inline]
pub const fn next_halfedge(e: usize) -> usize {
    if e % 3 == 2 { e - 2 } else { e + 1 }
}

/// Andrew's monotone chain over integer points, counter-clockwise.
///
/// Returns indices into `points`. Collinear and duplicate points are dropped.
/// Fewer than three distinct points, or an all-collinear set, yield an empty
/// hull.
fn convex_hull(points: &[IVec2]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_unstable_by_key(|&i| (points[i].x, points[i].y));
    order.dedup_by_key(|i| points[*i]);
    if order.len() < 3 {
        return Vec::new();
    }

    let mut hull: Vec<usize> = Vec::with_capacity(order.len() * 2);
    for pass in [order.clone(), order.iter().rev().copied().collect()] {
        let floor = hull.len();
        for i in pass {
            while hull.len() >= floor + 2
                && cross(
                    points[hull[hull.len() - 2]],
                    points[hull[hull.len() - 1]],
                    points[i],
                ) <= 0
            {
                hull.pop();
            }
            hull.push(i);
        }
        // The last point of each chain starts the next one.
        hull.pop();
    }
    if hull.len() < 3 {
        hull.clear();
    }
    hull
}
