//! Boolean groups of shapes

use crate::bounds::Aabb;
use crate::point::Point3;
use crate::shape::{BoundingObject, Shape};
use serde::{Deserialize, Serialize};

/// How a group combines its base with its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// Inside the base or any operand
    Union,
    /// Inside the base and none of the operands
    Difference,
    /// Inside the base and every operand
    Intersection,
}

impl GroupMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::Difference => "difference",
            Self::Intersection => "intersection",
        }
    }
}

/// A base shape combined with an ordered list of operands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGroup")]
pub struct GroupShape {
    mode: GroupMode,
    base: Box<Shape>,
    operands: Vec<Shape>,
    #[serde(skip_serializing)]
    bounds: Aabb,
}

#[derive(Deserialize)]
struct RawGroup {
    mode: GroupMode,
    base: Box<Shape>,
    operands: Vec<Shape>,
}

impl From<RawGroup> for GroupShape {
    fn from(raw: RawGroup) -> Self {
        Self::new(raw.mode, *raw.base, raw.operands)
    }
}

impl GroupShape {
    /// Create a group. An empty operand list behaves like the base alone.
    pub fn new(mode: GroupMode, base: impl Into<Shape>, operands: Vec<Shape>) -> Self {
        let base = Box::new(base.into());
        let base_bounds = base.bounds();
        let bounds = match mode {
            GroupMode::Union => operands
                .iter()
                .fold(base_bounds, |acc, shape| acc.union(&shape.bounds())),
            GroupMode::Difference => base_bounds,
            GroupMode::Intersection => operands
                .iter()
                .fold(base_bounds, |acc, shape| acc.intersection(&shape.bounds())),
        };

        Self {
            mode,
            base,
            operands,
            bounds,
        }
    }

    pub fn mode(&self) -> GroupMode {
        self.mode
    }

    pub fn base(&self) -> &Shape {
        &self.base
    }

    pub fn operands(&self) -> &[Shape] {
        &self.operands
    }

    /// Append an operand, returning the extended group
    pub(crate) fn with_operand(self, operand: Shape) -> Self {
        let mut operands = self.operands;
        operands.push(operand);
        Self::new(self.mode, *self.base, operands)
    }
}

impl BoundingObject for GroupShape {
    fn contains(&self, point: Point3) -> bool {
        if self.mode != GroupMode::Union && !self.bounds.contains_point(point) {
            return false;
        }
        match self.mode {
            GroupMode::Union => {
                self.base.contains(point) || self.operands.iter().any(|s| s.contains(point))
            }
            GroupMode::Difference => {
                self.base.contains(point) && !self.operands.iter().any(|s| s.contains(point))
            }
            GroupMode::Intersection => {
                self.base.contains(point) && self.operands.iter().all(|s| s.contains(point))
            }
        }
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}
