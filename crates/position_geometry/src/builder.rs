//! Left-to-right composition of shapes
//!
//! Every operation applies to the running result of the operations before it:
//! `add(a).subtract(b).add(c)` is `(a - b) + c`, not `a - b + c` reordered.
//! Runs of the same operation are gathered into one group node; a change of
//! operation wraps the running result as the base of a new node.

use crate::error::{Result, ShapeError};
use crate::group::{GroupMode, GroupShape};
use crate::shape::Shape;

/// A single builder step
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOp {
    /// Union with the running result (the first add sets the base)
    Add(Shape),
    /// Remove from the running result
    Subtract(Shape),
    /// Keep only the overlap with the running result
    Intersect(Shape),
}

impl BuildOp {
    fn mode(&self) -> GroupMode {
        match self {
            Self::Add(_) => GroupMode::Union,
            Self::Subtract(_) => GroupMode::Difference,
            Self::Intersect(_) => GroupMode::Intersection,
        }
    }

    fn shape(&self) -> &Shape {
        match self {
            Self::Add(shape) | Self::Subtract(shape) | Self::Intersect(shape) => shape,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Subtract(_) => "subtract",
            Self::Intersect(_) => "intersect",
        }
    }
}

/// Builder for boolean shape groups
#[derive(Debug, Clone, Default)]
pub struct ShapeBuilder {
    ops: Vec<BuildOp>,
}

impl ShapeBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Union a shape with the running result
    pub fn add(mut self, shape: impl Into<Shape>) -> Self {
        self.ops.push(BuildOp::Add(shape.into()));
        self
    }

    /// Subtract a shape from the running result
    pub fn subtract(mut self, shape: impl Into<Shape>) -> Self {
        self.ops.push(BuildOp::Subtract(shape.into()));
        self
    }

    /// Intersect the running result with a shape
    pub fn intersect(mut self, shape: impl Into<Shape>) -> Self {
        self.ops.push(BuildOp::Intersect(shape.into()));
        self
    }

    /// Queued operations, in the order issued
    pub fn ops(&self) -> &[BuildOp] {
        &self.ops
    }

    /// Build the shape tree. The builder is left untouched, so every call
    /// returns a fresh, independent tree.
    pub fn build(&self) -> Result<Shape> {
        let mut ops = self.ops.iter();
        let first = ops.next().ok_or(ShapeError::EmptyBuilder)?;
        if !matches!(first, BuildOp::Add(_)) {
            return Err(ShapeError::MissingBase(first.name()));
        }

        let mut running = first.shape().clone();
        // Whether `running` is a node this builder created and may extend
        let mut owned_node = false;

        for op in ops {
            let mode = op.mode();
            running = match running {
                Shape::Group(group) if owned_node && group.mode() == mode => {
                    Shape::Group(group.with_operand(op.shape().clone()))
                }
                other => Shape::Group(GroupShape::new(mode, other, vec![op.shape().clone()])),
            };
            owned_node = true;
        }

        Ok(running)
    }
}
