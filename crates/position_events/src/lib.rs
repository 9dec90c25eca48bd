//! # position_events - Area Enter/Leave Events
//!
//! Registry of monitored areas with per-subject transition tracking.
//!
//! # Features
//!
//! - Regions attributed to owners, torn down together
//! - Silent first observation, then one callback per enter or leave
//! - Callback failures isolated per region and queued as faults
//! - Optional map scoping and poll interval enforcement
//! - Parallel passes sharded by subject
//!
//! # Example
//!
//! ```
//! use position_events::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let context = PositionEventsContext::default();
//! let owner = context.register_owner("example");
//!
//! let fired = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&fired);
//! let area = BoxShape::new(Point3::new(50.0, 50.0, 10.0), Point3::new(60.0, 70.0, 40.0))?;
//! context.register(owner, Duration::from_millis(15), area, move |_, _| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     Ok(())
//! }, false)?;
//!
//! for p in [[0.0, 0.0, 0.0], [55.0, 60.0, 20.0], [0.0, 0.0, 0.0]] {
//!     context.update(&[PositionData::player(15, Point3::from_array(p))]);
//! }
//! assert_eq!(fired.load(Ordering::SeqCst), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod handle;
pub mod position;
pub mod region;
pub mod registry;
pub mod tracker;

mod recovery;

pub use position_geometry;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::context::{OwnerScope, PassReport, PositionEventsContext};
    pub use crate::error::{CallbackError, PositionEventsError, Result};
    pub use crate::events::{AreaCallback, CallbackResult, RegionFault, Transition, TransitionEvent};
    pub use crate::handle::{MapId, OwnerId, RegionHandle, SubjectId};
    pub use crate::position::PositionData;
    pub use crate::region::{AreaDescription, Region, RegionDesc};
    pub use crate::registry::{RegionRegistry, RegionSnapshot};
    pub use crate::tracker::{MembershipState, TransitionTracker};
    pub use position_geometry::prelude::*;
}

pub use prelude::*;
