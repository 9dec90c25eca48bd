//! Per-subject membership state for one region
//!
//! The first observation of a subject only records a baseline. After that,
//! every change between inside and outside yields exactly one transition.
//! The new state is stored before the transition is handed back, so a failing
//! callback can never leave the tracker out of step with the geometry.

use crate::events::Transition;
use crate::handle::SubjectId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

/// Last known membership of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MembershipState {
    /// Never observed
    #[default]
    Unknown,
    /// Last seen outside
    Outside,
    /// Last seen inside
    Inside,
}

impl MembershipState {
    #[inline]
    pub fn from_inside(inside: bool) -> Self {
        if inside {
            Self::Inside
        } else {
            Self::Outside
        }
    }

    /// Step the state machine with a fresh containment result
    fn advance(&mut self, inside: bool) -> Option<Transition> {
        let next = Self::from_inside(inside);
        let transition = match *self {
            Self::Unknown => None,
            current if current == next => None,
            _ if inside => Some(Transition::Entered),
            _ => Some(Transition::Left),
        };
        *self = next;
        transition
    }
}

/// Membership cells for every subject seen by one region.
///
/// Each cell has its own lock; the map lock is only taken for writing when a
/// subject is seen for the first time (or forgotten).
#[derive(Debug, Default)]
pub struct TransitionTracker {
    cells: RwLock<HashMap<SubjectId, Mutex<MembershipState>>>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a containment result, returning the transition it causes
    pub fn observe(&self, subject: SubjectId, inside: bool) -> Option<Transition> {
        {
            let cells = self.cells.read();
            if let Some(cell) = cells.get(&subject) {
                return cell.lock().advance(inside);
            }
        }

        let mut cells = self.cells.write();
        cells
            .entry(subject)
            .or_insert_with(|| Mutex::new(MembershipState::Unknown))
            .get_mut()
            .advance(inside)
    }

    /// Current state for a subject
    pub fn state(&self, subject: SubjectId) -> MembershipState {
        self.cells
            .read()
            .get(&subject)
            .map(|cell| *cell.lock())
            .unwrap_or_default()
    }

    /// Drop a subject's state; its next observation is a fresh baseline
    pub fn forget(&self, subject: SubjectId) -> bool {
        self.cells.write().remove(&subject).is_some()
    }

    /// Subjects currently inside
    pub fn inside(&self) -> Vec<SubjectId> {
        let mut subjects: Vec<SubjectId> = self
            .cells
            .read()
            .iter()
            .filter(|(_, cell)| *cell.lock() == MembershipState::Inside)
            .map(|(subject, _)| *subject)
            .collect();
        subjects.sort();
        subjects
    }

    /// Number of subjects with a recorded state
    pub fn tracked_count(&self) -> usize {
        self.cells.read().len()
    }

    /// Forget every subject
    pub fn reset(&self) {
        self.cells.write().clear();
    }
}
