//! # position_geometry - Bounding Shapes
//!
//! Geometric containment model for monitored areas.
//!
//! # Features
//!
//! - Axis-aligned boxes, spheres and vertically extruded polygons (prisms)
//! - Union, difference and intersection groups
//! - A left-to-right builder for composing groups
//!
//! The vertical axis is `z`. Prism footprints live in the `(x, y)` plane.
//!
//! # Example
//!
//! ```
//! use position_geometry::prelude::*;
//!
//! let outer = SphereShape::new(Point3::new(-20.0, -20.0, 20.0), 20.0)?;
//! let inner = SphereShape::new(Point3::new(-23.0, -26.0, 23.0), 8.0)?;
//!
//! let shell = ShapeBuilder::new().add(outer).subtract(inner).build()?;
//!
//! assert!(shell.contains(Point3::new(-20.0, -20.0, 5.0)));
//! assert!(!shell.contains(Point3::new(-23.0, -26.0, 23.0)));
//! # Ok::<(), position_geometry::ShapeError>(())
//! ```

pub mod bounds;
pub mod builder;
pub mod error;
pub mod group;
pub mod point;
pub mod polygon;
pub mod primitives;
pub mod shape;

pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::builder::{BuildOp, ShapeBuilder};
    pub use crate::error::{Result, ShapeError};
    pub use crate::group::{GroupMode, GroupShape};
    pub use crate::point::{Point2, Point3};
    pub use crate::polygon::Polygon;
    pub use crate::primitives::{BoxShape, PrismShape, SphereShape};
    pub use crate::shape::{BoundingObject, Shape};
}

pub use prelude::*;
