//! Simple polygons on the horizontal plane
//!
//! Points lying exactly on an edge or a vertex count as inside. Everything else
//! is decided by the even-odd crossing rule, using a half-open convention on
//! vertex heights so that a ray passing through a vertex is counted once.

use crate::error::{Result, ShapeError};
use crate::point::Point2;
use serde::{Deserialize, Serialize};

/// Closed polygon loop; the last vertex implicitly connects to the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2>", into = "Vec<Point2>")]
pub struct Polygon {
    vertices: Vec<Point2>,
    min: Point2,
    max: Point2,
}

impl Polygon {
    /// Create a polygon from its vertex loop.
    ///
    /// A trailing vertex equal to the first one is dropped, so explicitly
    /// closed loops are accepted too.
    pub fn new(vertices: impl IntoIterator<Item = impl Into<Point2>>) -> Result<Self> {
        let mut vertices: Vec<Point2> = vertices.into_iter().map(Into::into).collect();

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(ShapeError::DegeneratePolygon(vertices.len()));
        }
        if !vertices.iter().all(|v| v.is_finite()) {
            return Err(ShapeError::NonFinite("polygon vertex"));
        }

        let mut min = Point2::splat(f64::MAX);
        let mut max = Point2::splat(f64::MIN);
        for v in &vertices {
            min = Point2::new(min.x.min(v.x), min.y.min(v.y));
            max = Point2::new(max.x.max(v.x), max.y.max(v.y));
        }

        Ok(Self { vertices, min, max })
    }

    /// Vertices in loop order
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Number of vertices (and edges)
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; a constructed polygon has at least three vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Lower corner of the 2D bounding rectangle
    pub fn min(&self) -> Point2 {
        self.min
    }

    /// Upper corner of the 2D bounding rectangle
    pub fn max(&self) -> Point2 {
        self.max
    }

    /// Iterate edges as `(start, end)` pairs, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed area (positive for counter-clockwise loops)
    pub fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| a.cross(b)).sum::<f64>() * 0.5
    }

    /// Check if a point is inside or on the boundary
    pub fn contains(&self, point: Point2) -> bool {
        let in_bounds = point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y;
        if !in_bounds {
            return false;
        }

        let mut inside = false;
        for (a, b) in self.edges() {
            if on_segment(point, a, b) {
                return true;
            }
            // Edge straddles the horizontal line through the point
            if (a.y > point.y) != (b.y > point.y) {
                let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

impl TryFrom<Vec<Point2>> for Polygon {
    type Error = ShapeError;

    fn try_from(vertices: Vec<Point2>) -> Result<Self> {
        Self::new(vertices)
    }
}

impl From<Polygon> for Vec<Point2> {
    fn from(polygon: Polygon) -> Self {
        polygon.vertices
    }
}

/// Exact test for `p` lying on the closed segment `a..b`
#[inline]
fn on_segment(p: Point2, a: Point2, b: Point2) -> bool {
    if (b - a).cross(p - a) != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
