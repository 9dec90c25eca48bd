//! The shape tree

use crate::bounds::Aabb;
use crate::group::{GroupMode, GroupShape};
use crate::point::Point3;
use crate::primitives::{BoxShape, PrismShape, SphereShape};
use serde::{Deserialize, Serialize};

/// A geometric predicate over world positions
pub trait BoundingObject {
    /// Check if a point is inside this object
    fn contains(&self, point: Point3) -> bool;

    /// Bounds enclosing every contained point
    fn bounds(&self) -> Aabb;
}

/// Any monitored shape: a primitive or a boolean group of shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned box
    Box(BoxShape),
    /// Sphere
    Sphere(SphereShape),
    /// Vertically extruded polygon
    Prism(PrismShape),
    /// Boolean combination
    Group(GroupShape),
}

impl Shape {
    /// Number of primitive leaves in this tree
    pub fn primitive_count(&self) -> usize {
        match self {
            Self::Group(group) => {
                group.base().primitive_count()
                    + group.operands().iter().map(Shape::primitive_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    /// Depth of the tree; primitives have depth 1
    pub fn depth(&self) -> usize {
        match self {
            Self::Group(group) => {
                let child = group
                    .operands()
                    .iter()
                    .map(Shape::depth)
                    .chain(core::iter::once(group.base().depth()))
                    .max()
                    .unwrap_or(0);
                child + 1
            }
            _ => 1,
        }
    }

    /// Union of this shape and `other`
    pub fn union(self, other: impl Into<Shape>) -> Self {
        Self::Group(GroupShape::new(GroupMode::Union, self, vec![other.into()]))
    }

    /// This shape minus `other`
    pub fn difference(self, other: impl Into<Shape>) -> Self {
        Self::Group(GroupShape::new(GroupMode::Difference, self, vec![other.into()]))
    }

    /// Overlap of this shape and `other`
    pub fn intersection(self, other: impl Into<Shape>) -> Self {
        Self::Group(GroupShape::new(GroupMode::Intersection, self, vec![other.into()]))
    }
}

impl BoundingObject for Shape {
    #[inline]
    fn contains(&self, point: Point3) -> bool {
        match self {
            Self::Box(shape) => shape.contains(point),
            Self::Sphere(shape) => shape.contains(point),
            Self::Prism(shape) => shape.contains(point),
            Self::Group(shape) => shape.contains(point),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            Self::Box(shape) => shape.bounds(),
            Self::Sphere(shape) => shape.bounds(),
            Self::Prism(shape) => shape.bounds(),
            Self::Group(shape) => shape.bounds(),
        }
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Self::Box(shape)
    }
}

impl From<SphereShape> for Shape {
    fn from(shape: SphereShape) -> Self {
        Self::Sphere(shape)
    }
}

impl From<PrismShape> for Shape {
    fn from(shape: PrismShape) -> Self {
        Self::Prism(shape)
    }
}

impl From<GroupShape> for Shape {
    fn from(shape: GroupShape) -> Self {
        Self::Group(shape)
    }
}
