//! Transition events, callbacks and faults

use crate::error::CallbackError;
use crate::handle::{OwnerId, RegionHandle};
use crate::position::PositionData;
use serde::{Deserialize, Serialize};

/// Direction of a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Subject moved from outside to inside
    Entered,
    /// Subject moved from inside to outside
    Left,
}

impl Transition {
    /// Whether the subject is inside after this transition
    #[inline]
    pub fn is_inside(self) -> bool {
        self == Self::Entered
    }
}

/// A transition that fired during a pass
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionEvent {
    /// Region that was entered or left
    pub region: RegionHandle,
    /// Owner of that region
    pub owner: OwnerId,
    /// Direction
    pub transition: Transition,
    /// The position that caused it
    pub position: PositionData,
}

impl TransitionEvent {
    pub fn is_enter(&self) -> bool {
        self.transition == Transition::Entered
    }

    pub fn is_exit(&self) -> bool {
        self.transition == Transition::Left
    }
}

/// Value returned by transition callbacks
pub type CallbackResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Callback invoked with the position and whether the subject is now inside
pub type AreaCallback = Box<dyn Fn(&PositionData, bool) -> CallbackResult + Send + Sync>;

/// A callback failure, attributed to its region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFault {
    /// Region whose callback failed
    pub region: RegionHandle,
    /// Owner of that region
    pub owner: OwnerId,
    /// Transition being delivered
    pub transition: Transition,
    /// What went wrong
    pub error: CallbackError,
}
