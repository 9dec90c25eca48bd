//! Subject positions fed into the engine each tick

use crate::handle::{MapId, SubjectId};
use position_geometry::Point3;
use serde::{Deserialize, Serialize};

/// Where a subject is, and on which map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionData {
    /// Who moved
    pub subject: SubjectId,
    /// Map the position belongs to
    pub map_id: MapId,
    /// World position (`z` up)
    pub position: Point3,
}

impl PositionData {
    pub fn new(subject: SubjectId, map_id: MapId, position: Point3) -> Self {
        Self {
            subject,
            map_id,
            position,
        }
    }

    /// Position of the local player
    pub fn player(map_id: MapId, position: Point3) -> Self {
        Self::new(SubjectId::LOCAL_PLAYER, map_id, position)
    }
}
