//! Position events context - the engine facade handed to dependent code
//!
//! A context owns the region registry, evaluates batches of positions against
//! it and delivers transitions to region callbacks. One pass walks the
//! regions in registration order; a callback failure is logged, queued on the
//! fault channel and recorded in the pass report, and the pass carries on.

use crate::config::EngineConfig;
use crate::error::{PositionEventsError, Result};
use crate::events::{CallbackResult, RegionFault, TransitionEvent};
use crate::handle::{IdGenerator, OwnerId, RegionHandle, SubjectId};
use crate::position::PositionData;
use crate::recovery::panic_message;
use crate::region::{Region, RegionDesc};
use crate::registry::RegionRegistry;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use position_geometry::Shape;
use std::collections::HashMap;
use std::panic;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Containment tests performed
    pub evaluated: usize,
    /// Regions skipped because their poll interval had not elapsed
    pub skipped_regions: usize,
    /// Transitions that fired, in delivery order
    pub transitions: Vec<TransitionEvent>,
    /// Callback failures
    pub faults: Vec<RegionFault>,
}

impl PassReport {
    /// Number of callbacks invoked
    pub fn fired(&self) -> usize {
        self.transitions.len()
    }

    /// Fail with the first callback fault of the pass, if any
    pub fn check(&self) -> Result<()> {
        match self.faults.first() {
            Some(fault) => Err(fault.error.clone().into()),
            None => Ok(()),
        }
    }

    fn merge(&mut self, other: PassReport) {
        self.evaluated += other.evaluated;
        self.transitions.extend(other.transitions);
        self.faults.extend(other.faults);
    }
}

/// The spatial trigger engine
pub struct PositionEventsContext {
    config: EngineConfig,
    registry: RegionRegistry,
    owners: RwLock<HashMap<OwnerId, String>>,
    next_owner: IdGenerator,
    fault_sender: Sender<RegionFault>,
    fault_receiver: Receiver<RegionFault>,
}

impl PositionEventsContext {
    /// Create a context
    pub fn new(config: EngineConfig) -> Self {
        let (fault_sender, fault_receiver) = match config.fault_channel_capacity {
            Some(capacity) => crossbeam_channel::bounded(capacity),
            None => crossbeam_channel::unbounded(),
        };

        Self {
            config,
            registry: RegionRegistry::new(),
            owners: RwLock::new(HashMap::new()),
            next_owner: IdGenerator::new(),
            fault_sender,
            fault_receiver,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the region registry
    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    // ========== Owners ==========

    /// Allocate an owner identity. The name only appears in logs.
    pub fn register_owner(&self, name: impl Into<String>) -> OwnerId {
        let owner = OwnerId(self.next_owner.next());
        let name = name.into();
        log::debug!("Registered owner {} as {}", name, owner);
        self.owners.write().insert(owner, name);
        owner
    }

    /// Allocate an owner whose regions are unregistered when the scope drops
    pub fn owner_scope(self: &Arc<Self>, name: impl Into<String>) -> OwnerScope {
        let owner = self.register_owner(name);
        OwnerScope {
            context: Arc::clone(self),
            owner,
        }
    }

    /// Name given to an owner at registration
    pub fn owner_name(&self, owner: OwnerId) -> Option<String> {
        self.owners.read().get(&owner).cloned()
    }

    /// Tear down an owner: unregister all of its regions.
    /// Returns how many regions were removed.
    pub fn unregister_owner(&self, owner: OwnerId) -> usize {
        // Held across the registry update so no region can be added meanwhile
        let mut owners = self.owners.write();
        let name = owners.remove(&owner);
        let removed = self.registry.unregister_owner(owner);
        drop(owners);
        log::info!(
            "Owner {} torn down, {} region(s) removed",
            name.as_deref().unwrap_or("<unnamed>"),
            removed.len()
        );
        removed.len()
    }

    // ========== Regions ==========

    /// Register a region for `owner`
    pub fn register<F>(
        &self,
        owner: OwnerId,
        poll_interval: Duration,
        shape: impl Into<Shape>,
        callback: F,
        debug: bool,
    ) -> Result<RegionHandle>
    where
        F: Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static,
    {
        let desc = RegionDesc::new(owner, poll_interval, shape, callback).with_debug(debug);
        self.register_region(desc)
    }

    /// Register a region from a full description. The owner must have been
    /// issued by [`register_owner`](Self::register_owner) and not torn down.
    pub fn register_region(&self, desc: RegionDesc) -> Result<RegionHandle> {
        let owners = self.owners.read();
        if !owners.contains_key(&desc.owner) {
            return Err(PositionEventsError::InvalidArgument(format!(
                "{} is not a registered owner",
                desc.owner
            )));
        }
        if desc.debug {
            log::warn!(
                "Region for {} registered with debug visualisation enabled; do not ship this",
                desc.owner
            );
        }
        // Owner table stays read-locked until the region is in
        let handle = self.registry.register(desc);
        drop(owners);
        handle
    }

    /// Unregister a region. An unknown handle is reported but harmless.
    pub fn unregister(&self, handle: RegionHandle) -> Result<()> {
        match self.registry.unregister(handle) {
            Ok(_) => Ok(()),
            Err(e) => {
                log::warn!("Cannot unregister: {}", e);
                Err(e)
            }
        }
    }

    /// Get a registered region
    pub fn region(&self, handle: RegionHandle) -> Option<Arc<Region>> {
        self.registry.get(handle)
    }

    /// Get region count
    pub fn region_count(&self) -> usize {
        self.registry.len()
    }

    /// Regions flagged for debug visualisation, for an external renderer
    pub fn debug_regions(&self) -> Vec<Arc<Region>> {
        self.registry
            .snapshot()
            .iter()
            .filter(|region| region.debug())
            .cloned()
            .collect()
    }

    /// Forget a subject in every region; its next position is a new baseline
    pub fn forget_subject(&self, subject: SubjectId) {
        for region in self.registry.snapshot().iter() {
            region.tracker().forget(subject);
        }
    }

    // ========== Evaluation ==========

    /// Evaluate a batch of positions on the calling thread
    pub fn update(&self, positions: &[PositionData]) -> PassReport {
        self.update_at(Instant::now(), positions)
    }

    /// Evaluate a batch of positions at an explicit time (used for poll
    /// interval enforcement)
    pub fn update_at(&self, now: Instant, positions: &[PositionData]) -> PassReport {
        let (due, skipped_regions) = self.due_regions(now);
        let mut report = self.evaluate(&due, positions);
        report.skipped_regions = skipped_regions;
        report
    }

    /// Evaluate a batch with the configured worker count
    pub fn update_parallel(&self, positions: &[PositionData]) -> PassReport {
        self.update_parallel_at(Instant::now(), positions, self.config.worker_threads)
    }

    /// Evaluate a batch across `workers` threads, sharding positions by
    /// subject. Each subject's transitions keep registration order; reports
    /// are merged shard by shard.
    pub fn update_parallel_at(
        &self,
        now: Instant,
        positions: &[PositionData],
        workers: usize,
    ) -> PassReport {
        let (due, skipped_regions) = self.due_regions(now);
        let workers = workers.clamp(1, positions.len().max(1));

        let mut shards: Vec<Vec<PositionData>> = vec![Vec::new(); workers];
        for data in positions {
            shards[(data.subject.to_bits() % workers as u64) as usize].push(*data);
        }
        shards.retain(|shard| !shard.is_empty());

        let mut report = if shards.len() <= 1 {
            self.evaluate(&due, positions)
        } else {
            let due = &due;
            let outcome = crossbeam_utils::thread::scope(|scope| {
                let handles: Vec<_> = shards
                    .iter()
                    .map(|shard| scope.spawn(move |_| self.evaluate(due, shard)))
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join())
                    .collect::<std::thread::Result<Vec<PassReport>>>()
            });

            match outcome {
                Ok(Ok(reports)) => reports.into_iter().fold(PassReport::default(), |mut acc, r| {
                    acc.merge(r);
                    acc
                }),
                Ok(Err(payload)) | Err(payload) => {
                    log::error!("Worker panicked during pass: {}", panic_message(payload.as_ref()));
                    panic::resume_unwind(payload)
                }
            }
        };
        report.skipped_regions = skipped_regions;
        report
    }

    /// Receiver for callback faults. Every clone competes for the same faults.
    pub fn faults(&self) -> Receiver<RegionFault> {
        self.fault_receiver.clone()
    }

    /// Take all queued faults
    pub fn drain_faults(&self) -> Vec<RegionFault> {
        self.fault_receiver.try_iter().collect()
    }

    fn due_regions(&self, now: Instant) -> (Vec<Arc<Region>>, usize) {
        let snapshot = self.registry.snapshot();
        if !self.config.enforce_poll_interval {
            return (snapshot.iter().cloned().collect(), 0);
        }

        let due: Vec<Arc<Region>> = snapshot
            .iter()
            .filter(|region| region.poll_due(now))
            .cloned()
            .collect();
        let skipped = snapshot.len() - due.len();
        (due, skipped)
    }

    fn evaluate(&self, regions: &[Arc<Region>], positions: &[PositionData]) -> PassReport {
        let mut report = PassReport::default();
        for region in regions {
            for data in positions {
                self.evaluate_one(region, data, &mut report);
            }
        }
        report
    }

    fn evaluate_one(&self, region: &Region, data: &PositionData, report: &mut PassReport) {
        let inside = region.contains(data);
        report.evaluated += 1;

        // State is committed here, before the callback runs
        let Some(transition) = region.tracker().observe(data.subject, inside) else {
            return;
        };

        if self.config.log_transitions {
            log::debug!("{} {:?} {} at {:?}", data.subject, transition, region, data.position);
        }
        report.transitions.push(TransitionEvent {
            region: region.handle(),
            owner: region.owner(),
            transition,
            position: *data,
        });

        if let Err(error) = region.notify(data, inside, self.config.isolate_panics) {
            log::error!("Callback of {} failed on {:?}: {}", region, transition, error);
            let fault = RegionFault {
                region: region.handle(),
                owner: region.owner(),
                transition,
                error,
            };
            self.report_fault(fault.clone());
            report.faults.push(fault);
        }
    }

    fn report_fault(&self, fault: RegionFault) {
        match self.fault_sender.try_send(fault) {
            Ok(()) => {}
            Err(TrySendError::Full(fault)) => {
                // Evict the oldest queued fault to make room
                if let Ok(oldest) = self.fault_receiver.try_recv() {
                    log::warn!("Fault channel full, dropping fault for {}", oldest.region);
                }
                if let Err(TrySendError::Full(fault)) = self.fault_sender.try_send(fault) {
                    log::warn!("Fault channel full, dropping fault for {}", fault.region);
                }
            }
            // The context holds a receiver, so the channel never disconnects
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl Default for PositionEventsContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for PositionEventsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionEventsContext")
            .field("config", &self.config)
            .field("regions", &self.registry.len())
            .field("owners", &self.owners.read().len())
            .finish()
    }
}

/// Registers regions on behalf of one owner and unregisters all of them when
/// dropped
pub struct OwnerScope {
    context: Arc<PositionEventsContext>,
    owner: OwnerId,
}

impl OwnerScope {
    /// The owner identity of this scope
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn context(&self) -> &Arc<PositionEventsContext> {
        &self.context
    }

    /// Register a region for this owner
    pub fn register<F>(
        &self,
        poll_interval: Duration,
        shape: impl Into<Shape>,
        callback: F,
        debug: bool,
    ) -> Result<RegionHandle>
    where
        F: Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static,
    {
        self.context.register(self.owner, poll_interval, shape, callback, debug)
    }

    /// Start a region description for this owner
    pub fn describe<F>(
        &self,
        poll_interval: Duration,
        shape: impl Into<Shape>,
        callback: F,
    ) -> RegionDesc
    where
        F: Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static,
    {
        RegionDesc::new(self.owner, poll_interval, shape, callback)
    }

    /// Register a described region. The description must belong to this owner.
    pub fn register_region(&self, desc: RegionDesc) -> Result<RegionHandle> {
        if desc.owner != self.owner {
            return Err(PositionEventsError::InvalidArgument(format!(
                "region belongs to {}, not {}",
                desc.owner, self.owner
            )));
        }
        self.context.register_region(desc)
    }

    /// Regions still registered for this owner
    pub fn region_count(&self) -> usize {
        self.context.registry().regions_of(self.owner).len()
    }
}

impl Drop for OwnerScope {
    fn drop(&mut self) {
        self.context.unregister_owner(self.owner);
    }
}

impl std::fmt::Debug for OwnerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerScope").field("owner", &self.owner).finish()
    }
}
