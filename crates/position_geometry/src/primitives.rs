//! Primitive bounding shapes

use crate::bounds::Aabb;
use crate::error::{Result, ShapeError};
use crate::point::{Point2, Point3};
use crate::polygon::Polygon;
use crate::shape::BoundingObject;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, closed on all three axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBox")]
pub struct BoxShape {
    min: Point3,
    max: Point3,
}

#[derive(Deserialize)]
struct RawBox {
    min: Point3,
    max: Point3,
}

impl TryFrom<RawBox> for BoxShape {
    type Error = ShapeError;

    fn try_from(raw: RawBox) -> Result<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl BoxShape {
    /// Create a box from two corners. `min` must not exceed `max` on any axis.
    pub fn new(min: Point3, max: Point3) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ShapeError::NonFinite("box corner"));
        }
        for (axis, lo, hi) in [("x", min.x, max.x), ("y", min.y, max.y), ("z", min.z, max.z)] {
            if lo > hi {
                return Err(ShapeError::InvertedBox { axis, min: lo, max: hi });
            }
        }
        Ok(Self { min, max })
    }

    /// Create a box from any two opposite corners
    pub fn from_corners(a: Point3, b: Point3) -> Result<Self> {
        Self::new(a.min(b), a.max(b))
    }

    pub fn min(&self) -> Point3 {
        self.min
    }

    pub fn max(&self) -> Point3 {
        self.max
    }
}

impl BoundingObject for BoxShape {
    #[inline]
    fn contains(&self, point: Point3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }
}

/// Sphere, boundary inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSphere")]
pub struct SphereShape {
    center: Point3,
    radius: f64,
    #[serde(skip_serializing)]
    radius_sq: f64,
}

#[derive(Deserialize)]
struct RawSphere {
    center: Point3,
    radius: f64,
}

impl TryFrom<RawSphere> for SphereShape {
    type Error = ShapeError;

    fn try_from(raw: RawSphere) -> Result<Self> {
        Self::new(raw.center, raw.radius)
    }
}

impl SphereShape {
    /// Create a sphere. A zero radius contains only the center.
    pub fn new(center: Point3, radius: f64) -> Result<Self> {
        if !center.is_finite() {
            return Err(ShapeError::NonFinite("sphere center"));
        }
        if !radius.is_finite() {
            return Err(ShapeError::NonFinite("sphere radius"));
        }
        if radius < 0.0 {
            return Err(ShapeError::NegativeRadius(radius));
        }
        Ok(Self {
            center,
            radius,
            radius_sq: radius * radius,
        })
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl BoundingObject for SphereShape {
    #[inline]
    fn contains(&self, point: Point3) -> bool {
        point.distance_squared(self.center) <= self.radius_sq
    }

    fn bounds(&self) -> Aabb {
        let r = Point3::splat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }
}

/// Polygon footprint extruded upwards from `base_elevation` by `height`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrism")]
pub struct PrismShape {
    height: f64,
    base_elevation: f64,
    footprint: Polygon,
}

#[derive(Deserialize)]
struct RawPrism {
    height: f64,
    base_elevation: f64,
    footprint: Polygon,
}

impl TryFrom<RawPrism> for PrismShape {
    type Error = ShapeError;

    fn try_from(raw: RawPrism) -> Result<Self> {
        Self::from_polygon(raw.height, raw.base_elevation, raw.footprint)
    }
}

impl PrismShape {
    /// Create a prism from its footprint vertices (at least three)
    pub fn new(
        height: f64,
        base_elevation: f64,
        vertices: impl IntoIterator<Item = impl Into<Point2>>,
    ) -> Result<Self> {
        Self::from_polygon(height, base_elevation, Polygon::new(vertices)?)
    }

    /// Create a prism from an already validated footprint
    pub fn from_polygon(height: f64, base_elevation: f64, footprint: Polygon) -> Result<Self> {
        if !height.is_finite() || !base_elevation.is_finite() {
            return Err(ShapeError::NonFinite("prism extent"));
        }
        if height < 0.0 {
            return Err(ShapeError::NegativeHeight(height));
        }
        Ok(Self {
            height,
            base_elevation,
            footprint,
        })
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    /// Elevation of the top face
    pub fn top_elevation(&self) -> f64 {
        self.base_elevation + self.height
    }

    pub fn footprint(&self) -> &Polygon {
        &self.footprint
    }
}

impl BoundingObject for PrismShape {
    fn contains(&self, point: Point3) -> bool {
        // NaN elevations are outside
        if !(point.z >= self.base_elevation && point.z <= self.top_elevation()) {
            return false;
        }
        self.footprint.contains(point.horizontal())
    }

    fn bounds(&self) -> Aabb {
        let (min, max) = (self.footprint.min(), self.footprint.max());
        Aabb::new(
            Point3::new(min.x, min.y, self.base_elevation),
            Point3::new(max.x, max.y, self.top_elevation()),
        )
    }
}
