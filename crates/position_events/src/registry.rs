//! Region registry
//!
//! Regions are kept in a copy-on-write snapshot: a pass clones the `Arc` to the
//! current list and never holds the lock while evaluating, while registration
//! swaps in a new list under a short write lock.

use crate::error::{PositionEventsError, Result};
use crate::handle::{IdGenerator, OwnerId, RegionHandle};
use crate::region::{Region, RegionDesc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Registered regions in insertion order
pub type RegionSnapshot = Arc<Vec<Arc<Region>>>;

/// Owns every registered region
pub struct RegionRegistry {
    regions: RwLock<RegionSnapshot>,
    next_handle: IdGenerator,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self {
            regions: RwLock::new(Arc::new(Vec::new())),
            next_handle: IdGenerator::new(),
        }
    }

    /// Register a region
    pub fn register(&self, desc: RegionDesc) -> Result<RegionHandle> {
        desc.validate()?;

        let handle = RegionHandle(self.next_handle.next());
        let region = Arc::new(Region::new(handle, desc));
        log::debug!(
            "Registered {} for {} (poll {:?}, debug {})",
            region,
            region.owner(),
            region.poll_interval(),
            region.debug()
        );

        let mut regions = self.regions.write();
        Arc::make_mut(&mut *regions).push(region);
        Ok(handle)
    }

    /// Unregister a region, returning it
    pub fn unregister(&self, handle: RegionHandle) -> Result<Arc<Region>> {
        let mut regions = self.regions.write();
        let index = regions
            .iter()
            .position(|region| region.handle() == handle)
            .ok_or(PositionEventsError::UnknownHandle(handle))?;

        let region = Arc::make_mut(&mut *regions).remove(index);
        log::debug!("Unregistered {}", region);
        Ok(region)
    }

    /// Unregister every region of an owner, returning their handles
    pub fn unregister_owner(&self, owner: OwnerId) -> Vec<RegionHandle> {
        let mut regions = self.regions.write();
        if !regions.iter().any(|region| region.owner() == owner) {
            return Vec::new();
        }

        let mut removed = Vec::new();
        Arc::make_mut(&mut *regions).retain(|region| {
            let keep = region.owner() != owner;
            if !keep {
                removed.push(region.handle());
            }
            keep
        });
        removed
    }

    /// Current regions, in insertion order
    pub fn snapshot(&self) -> RegionSnapshot {
        Arc::clone(&self.regions.read())
    }

    /// Get a region
    pub fn get(&self, handle: RegionHandle) -> Option<Arc<Region>> {
        self.regions
            .read()
            .iter()
            .find(|region| region.handle() == handle)
            .cloned()
    }

    /// Check if a handle is registered
    pub fn contains(&self, handle: RegionHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Regions attributed to an owner
    pub fn regions_of(&self, owner: OwnerId) -> Vec<Arc<Region>> {
        self.regions
            .read()
            .iter()
            .filter(|region| region.owner() == owner)
            .cloned()
            .collect()
    }

    /// Get region count
    pub fn len(&self) -> usize {
        self.regions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.read().is_empty()
    }
}

impl Default for RegionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionRegistry")
            .field("regions", &self.len())
            .finish()
    }
}
