//! Registered regions and their descriptions

use crate::error::{CallbackError, PositionEventsError, Result};
use crate::events::{AreaCallback, CallbackResult};
use crate::handle::{MapId, OwnerId, RegionHandle};
use crate::position::PositionData;
use crate::recovery::invoke_callback;
use crate::tracker::TransitionTracker;
use parking_lot::Mutex;
use position_geometry::{BoundingObject, Shape};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Everything needed to register a region
pub struct RegionDesc {
    /// Owner the region is attributed to
    pub owner: OwnerId,
    /// Advisory evaluation interval
    pub poll_interval: Duration,
    /// Monitored shape
    pub shape: Shape,
    /// Transition callback
    pub callback: AreaCallback,
    /// Ask the host to visualise this region
    pub debug: bool,
    /// Only positions on this map can be inside
    pub map_scope: Option<MapId>,
    /// Name used in logs
    pub label: Option<String>,
}

impl RegionDesc {
    /// Create a description with no map scope and debug off
    pub fn new<F>(
        owner: OwnerId,
        poll_interval: Duration,
        shape: impl Into<Shape>,
        callback: F,
    ) -> Self
    where
        F: Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            owner,
            poll_interval,
            shape: shape.into(),
            callback: Box::new(callback),
            debug: false,
            map_scope: None,
            label: None,
        }
    }

    /// Create a description from a serialized area
    pub fn from_description<F>(owner: OwnerId, area: AreaDescription, callback: F) -> Self
    where
        F: Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            owner,
            poll_interval: Duration::from_millis(area.poll_interval_ms),
            shape: area.shape,
            callback: Box::new(callback),
            debug: area.debug,
            map_scope: area.map_id,
            label: area.label,
        }
    }

    /// Set the debug flag
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Restrict the region to one map
    pub fn on_map(mut self, map_id: MapId) -> Self {
        self.map_scope = Some(map_id);
        self
    }

    /// Set a label for logs
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(PositionEventsError::InvalidArgument(
                "poll interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for RegionDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionDesc")
            .field("owner", &self.owner)
            .field("poll_interval", &self.poll_interval)
            .field("shape", &self.shape)
            .field("debug", &self.debug)
            .field("map_scope", &self.map_scope)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Serializable area description (callback supplied at registration)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaDescription {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub map_id: Option<MapId>,
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub debug: bool,
    pub shape: Shape,
}

/// A region owned by the registry
pub struct Region {
    handle: RegionHandle,
    owner: OwnerId,
    poll_interval: Duration,
    shape: Shape,
    callback: AreaCallback,
    debug: bool,
    map_scope: Option<MapId>,
    label: Option<String>,
    tracker: TransitionTracker,
    last_polled: Mutex<Option<Instant>>,
}

impl Region {
    pub(crate) fn new(handle: RegionHandle, desc: RegionDesc) -> Self {
        Self {
            handle,
            owner: desc.owner,
            poll_interval: desc.poll_interval,
            shape: desc.shape,
            callback: desc.callback,
            debug: desc.debug,
            map_scope: desc.map_scope,
            label: desc.label,
            tracker: TransitionTracker::new(),
            last_polled: Mutex::new(None),
        }
    }

    pub fn handle(&self) -> RegionHandle {
        self.handle
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn map_scope(&self) -> Option<MapId> {
        self.map_scope
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Membership state of every subject seen by this region
    pub fn tracker(&self) -> &TransitionTracker {
        &self.tracker
    }

    /// Containment including the map scope
    pub fn contains(&self, data: &PositionData) -> bool {
        match self.map_scope {
            Some(map) if map != data.map_id => false,
            _ => self.shape.contains(data.position),
        }
    }

    /// Invoke the callback for a transition
    pub(crate) fn notify(
        &self,
        data: &PositionData,
        inside: bool,
        isolate_panics: bool,
    ) -> std::result::Result<(), CallbackError> {
        invoke_callback(isolate_panics, || (self.callback)(data, inside))
    }

    /// Check the poll interval and, when due, mark the region as polled
    pub(crate) fn poll_due(&self, now: Instant) -> bool {
        let mut last = self.last_polled.lock();
        match *last {
            Some(previous) if now.saturating_duration_since(previous) < self.poll_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} '{}'", self.handle, label),
            None => write!(f, "{}", self.handle),
        }
    }
}

// Manual Debug implementation (skip callback)
impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("handle", &self.handle)
            .field("owner", &self.owner)
            .field("poll_interval", &self.poll_interval)
            .field("shape", &self.shape)
            .field("debug", &self.debug)
            .field("map_scope", &self.map_scope)
            .field("label", &self.label)
            .field("tracked_subjects", &self.tracker.tracked_count())
            .finish()
    }
}
