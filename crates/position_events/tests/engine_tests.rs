//! Integration tests for position_events

use parking_lot::Mutex;
use position_events::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAP: MapId = 15;
const POLL: Duration = Duration::from_millis(15);

type Calls = Arc<Mutex<Vec<(SubjectId, bool)>>>;

fn recorder() -> (Calls, AreaCallback) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let callback = move |data: &PositionData, inside: bool| -> CallbackResult {
        sink.lock().push((data.subject, inside));
        Ok(())
    };
    let callback: AreaCallback = Box::new(callback);
    (calls, callback)
}

fn counter() -> (Arc<AtomicU32>, AreaCallback) {
    let count = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&count);
    let callback: AreaCallback = Box::new(move |_: &PositionData, _: bool| -> CallbackResult {
        sink.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (count, callback)
}

fn test_box() -> BoxShape {
    BoxShape::new(Point3::new(50.0, 50.0, 10.0), Point3::new(60.0, 70.0, 40.0)).unwrap()
}

fn at(x: f64, y: f64, z: f64) -> PositionData {
    PositionData::player(MAP, Point3::new(x, y, z))
}

fn inside() -> PositionData {
    at(55.0, 60.0, 20.0)
}

fn outside() -> PositionData {
    at(0.0, 0.0, 0.0)
}

// ========== Transitions ==========

#[test]
fn test_box_inside_outside_inside() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (calls, callback) = recorder();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    for data in [inside(), outside(), inside()] {
        context.update(&[data]);
    }

    let player = SubjectId::LOCAL_PLAYER;
    assert_eq!(*calls.lock(), vec![(player, false), (player, true)]);
}

#[test]
fn test_repeated_inside_is_silent() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (calls, callback) = recorder();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    let fired: Vec<usize> = [outside(), inside(), inside(), outside()]
        .iter()
        .map(|data| context.update(std::slice::from_ref(data)).fired())
        .collect();

    assert_eq!(fired, vec![0, 1, 0, 1]);
    let inside_flags: Vec<bool> = calls.lock().iter().map(|(_, inside)| *inside).collect();
    assert_eq!(inside_flags, vec![true, false]);
}

#[test]
fn test_boundary_counts_as_inside() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    context.update(&[outside()]);
    context.update(&[at(60.0, 70.0, 40.0)]);
    context.update(&[at(50.0, 55.0, 10.0)]);

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_regions_fire_in_registration_order() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let handles: Vec<RegionHandle> = (0..3)
        .map(|_| context.register(owner, POLL, test_box(), |_, _| Ok(()), false).unwrap())
        .collect();

    context.update(&[outside()]);
    let report = context.update(&[inside()]);

    let order: Vec<RegionHandle> = report.transitions.iter().map(|e| e.region).collect();
    assert_eq!(order, handles);
    assert!(report.transitions.iter().all(|e| e.is_enter() && e.owner == owner));
}

#[test]
fn test_subjects_tracked_independently() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (calls, callback) = recorder();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    let a = SubjectId(1);
    let b = SubjectId(2);
    let box_center = Point3::new(55.0, 60.0, 20.0);

    context.update(&[
        PositionData::new(a, MAP, Point3::ZERO),
        PositionData::new(b, MAP, box_center),
    ]);
    context.update(&[
        PositionData::new(a, MAP, box_center),
        PositionData::new(b, MAP, box_center),
    ]);

    assert_eq!(*calls.lock(), vec![(a, true)]);
}

#[test]
fn test_forget_subject_restarts_baseline() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    let handle = context.register(owner, POLL, test_box(), callback, false).unwrap();

    context.update(&[inside()]);
    context.forget_subject(SubjectId::LOCAL_PLAYER);
    context.update(&[outside()]);

    assert_eq!(count.load(Ordering::SeqCst), 0);
    let region = context.region(handle).unwrap();
    assert_eq!(region.tracker().state(SubjectId::LOCAL_PLAYER), MembershipState::Outside);
}

// ========== Registry ==========

#[test]
fn test_unknown_handle() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    context.register(owner, POLL, test_box(), |_, _| Ok(()), false).unwrap();

    let result = context.unregister(RegionHandle(42));

    assert_eq!(result, Err(PositionEventsError::UnknownHandle(RegionHandle(42))));
    assert_eq!(context.region_count(), 1);
}

#[test]
fn test_zero_poll_interval_rejected() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");

    let result = context.register(owner, Duration::ZERO, test_box(), |_, _| Ok(()), false);

    assert!(matches!(result, Err(PositionEventsError::InvalidArgument(_))));
    assert_eq!(context.region_count(), 0);
}

#[test]
fn test_shape_error_converts() {
    fn register_bad(context: &PositionEventsContext, owner: OwnerId) -> Result<RegionHandle> {
        let sphere = SphereShape::new(Point3::ZERO, -1.0)?;
        context.register(owner, POLL, sphere, |_, _| Ok(()), false)
    }

    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");

    assert_eq!(
        register_bad(&context, owner),
        Err(PositionEventsError::InvalidShape(ShapeError::NegativeRadius(-1.0)))
    );
}

#[test]
fn test_unregistered_region_stops_firing() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    let handle = context.register(owner, POLL, test_box(), callback, false).unwrap();

    context.update(&[outside()]);
    context.unregister(handle).unwrap();
    let report = context.update(&[inside()]);

    assert_eq!(report.evaluated, 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_owner_teardown() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("torn down");
    let survivor = context.register_owner("survivor");

    let (count, callback) = counter();
    let callback = Arc::new(callback);
    for _ in 0..3 {
        let callback = Arc::clone(&callback);
        context
            .register(owner, POLL, test_box(), move |data, inside| (*callback)(data, inside), false)
            .unwrap();
    }
    let (survivor_calls, survivor_callback) = recorder();
    context.register(survivor, POLL, test_box(), survivor_callback, false).unwrap();

    context.update(&[outside()]);
    assert_eq!(context.unregister_owner(owner), 3);
    assert_eq!(context.region_count(), 1);
    assert!(context.registry().regions_of(owner).is_empty());

    context.update(&[inside()]);
    context.update(&[outside()]);

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(survivor_calls.lock().len(), 2);
}

#[test]
fn test_owner_scope_drop() {
    let context = Arc::new(PositionEventsContext::default());
    let (count, callback) = counter();

    {
        let scope = context.owner_scope("PositionEventsExample");
        scope.register(POLL, test_box(), callback, false).unwrap();
        let desc = scope
            .describe(POLL, SphereShape::new(Point3::ZERO, 5.0).unwrap(), |_, _| Ok(()))
            .on_map(MAP)
            .with_label("sphere");
        scope.register_region(desc).unwrap();

        assert_eq!(scope.region_count(), 2);
        context.update(&[outside()]);
    }

    assert_eq!(context.region_count(), 0);
    context.update(&[inside()]);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

// ========== Faults ==========

#[test]
fn test_callback_failure_is_isolated() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");

    let failing = context
        .register(owner, POLL, test_box(), |_, _| Err("marker missing".into()), false)
        .unwrap();
    let panicking = context
        .register(owner, POLL, test_box(), |_, _| panic!("callback exploded"), false)
        .unwrap();
    let (calls, callback) = recorder();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    context.update(&[outside()]);
    let report = context.update(&[inside()]);

    assert_eq!(report.fired(), 3);
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(
        report.faults,
        vec![
            RegionFault {
                region: failing,
                owner,
                transition: Transition::Entered,
                error: CallbackError::Failed("marker missing".to_string()),
            },
            RegionFault {
                region: panicking,
                owner,
                transition: Transition::Entered,
                error: CallbackError::Panicked("callback exploded".to_string()),
            },
        ]
    );

    // State was committed despite the failures
    let region = context.region(failing).unwrap();
    assert_eq!(region.tracker().state(SubjectId::LOCAL_PLAYER), MembershipState::Inside);
    let report = context.update(&[inside()]);
    assert!(report.faults.is_empty());
    assert_eq!(report.fired(), 0);
}

#[test]
fn test_faults_reach_channel() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let handle = context
        .register(
            owner,
            POLL,
            test_box(),
            |_, inside| if inside { Ok(()) } else { Err("leave failed".into()) },
            false,
        )
        .unwrap();
    let faults = context.faults();

    context.update(&[inside()]);
    context.update(&[outside()]);

    let fault = faults.try_recv().unwrap();
    assert_eq!(fault.region, handle);
    assert_eq!(fault.transition, Transition::Left);
    assert_eq!(fault.error, CallbackError::Failed("leave failed".to_string()));
    assert!(faults.try_recv().is_err());
    assert!(context.drain_faults().is_empty());
}

#[test]
#[should_panic(expected = "unisolated")]
fn test_panic_propagates_when_not_isolated() {
    let context = PositionEventsContext::new(EngineConfig::default().with_panic_isolation(false));
    let owner = context.register_owner("test");
    context
        .register(owner, POLL, test_box(), |_, _| panic!("unisolated"), false)
        .unwrap();

    context.update(&[outside()]);
    context.update(&[inside()]);
}

#[test]
#[should_panic(expected = "worker unisolated")]
fn test_parallel_panic_propagates_when_not_isolated() {
    let config = EngineConfig::default().with_panic_isolation(false);
    let context = PositionEventsContext::new(config);
    let owner = context.register_owner("test");
    context
        .register(owner, POLL, test_box(), |_, _| panic!("worker unisolated"), false)
        .unwrap();

    let subjects = |position: Point3| -> Vec<PositionData> {
        (0..8).map(|id| PositionData::new(SubjectId(id), MAP, position)).collect()
    };
    context.update_parallel_at(Instant::now(), &subjects(Point3::ZERO), 4);
    context.update_parallel_at(Instant::now(), &subjects(Point3::new(55.0, 60.0, 20.0)), 4);
}

#[test]
fn test_default_fault_queue_stays_bounded() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    context
        .register(owner, POLL, test_box(), |_, _| Err("always".into()), false)
        .unwrap();

    for tick in 0..10_000 {
        context.update(&[if tick % 2 == 0 { inside() } else { outside() }]);
    }

    let capacity = context.config().fault_channel_capacity.unwrap();
    assert_eq!(context.faults().len(), capacity);
    assert_eq!(context.drain_faults().len(), capacity);
}

// ========== Map scope ==========

#[test]
fn test_map_change_leaves_region() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (calls, callback) = recorder();
    let desc = RegionDesc::new(owner, POLL, test_box(), callback).on_map(MAP);
    context.register_region(desc).unwrap();

    let center = Point3::new(55.0, 60.0, 20.0);
    context.update(&[PositionData::player(MAP, center)]);
    context.update(&[PositionData::player(MAP + 1, center)]);
    context.update(&[PositionData::player(MAP, center)]);

    let player = SubjectId::LOCAL_PLAYER;
    assert_eq!(*calls.lock(), vec![(player, false), (player, true)]);
}

// ========== Bad samples ==========

#[test]
fn test_nan_sample_does_not_join() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (calls, callback) = recorder();
    let prism = PrismShape::new(10.0, 0.0, [(0.0, 0.0), (15.0, 15.0), (15.0, -3.0)]).unwrap();
    let area = Shape::from(prism).union(test_box());
    context.register(owner, POLL, area, callback, false).unwrap();

    context.update(&[at(30.0, 30.0, 5.0)]);
    context.update(&[at(10.0, 5.0, f64::NAN)]);
    context.update(&[at(f64::INFINITY, 5.0, 5.0)]);
    assert!(calls.lock().is_empty());

    context.update(&[at(10.0, 5.0, 5.0)]);
    assert_eq!(*calls.lock(), vec![(SubjectId::LOCAL_PLAYER, true)]);
}

#[test]
fn test_unregistered_owner_rejected() {
    let context = Arc::new(PositionEventsContext::default());
    let scope = context.owner_scope("unloaded");
    let owner = scope.owner();
    drop(scope);

    let result = context.register(owner, POLL, test_box(), |_, _| Ok(()), false);

    assert!(matches!(result, Err(PositionEventsError::InvalidArgument(_))));
    assert_eq!(context.region_count(), 0);
}

// ========== Poll interval ==========

#[test]
fn test_poll_interval_advisory_by_default() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    context.register(owner, Duration::from_secs(60), test_box(), callback, false).unwrap();

    let start = Instant::now();
    context.update_at(start, &[outside()]);
    let report = context.update_at(start + Duration::from_millis(1), &[inside()]);

    assert_eq!(report.skipped_regions, 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_poll_interval_enforced() {
    let config = EngineConfig::default().with_poll_interval_enforcement(true);
    let context = PositionEventsContext::new(config);
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    context.register(owner, Duration::from_secs(1), test_box(), callback, false).unwrap();

    let start = Instant::now();
    context.update_at(start, &[outside()]);

    let report = context.update_at(start + Duration::from_millis(100), &[inside()]);
    assert_eq!(report.skipped_regions, 1);
    assert_eq!(report.evaluated, 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);

    let report = context.update_at(start + Duration::from_secs(1), &[inside()]);
    assert_eq!(report.skipped_regions, 0);
    assert_eq!(report.fired(), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// ========== Parallel ==========

fn walk(step: usize) -> Vec<PositionData> {
    (0..32u64)
        .map(|id| {
            let phase = (id as usize + step) % 4;
            let position = if phase < 2 {
                Point3::new(55.0, 60.0, 20.0)
            } else {
                Point3::new(55.0, 60.0, 45.0)
            };
            PositionData::new(SubjectId(id), MAP, position)
        })
        .collect()
}

fn sorted(mut transitions: Vec<TransitionEvent>) -> Vec<TransitionEvent> {
    transitions.sort_by_key(|e| (e.region.to_bits(), e.position.subject.to_bits()));
    transitions
}

#[test]
fn test_parallel_matches_serial() {
    let serial = PositionEventsContext::default();
    let parallel = PositionEventsContext::new(EngineConfig::default().with_workers(4));

    for context in [&serial, &parallel] {
        let owner = context.register_owner("test");
        context.register(owner, POLL, test_box(), |_, _| Ok(()), false).unwrap();
        let sphere = SphereShape::new(Point3::new(55.0, 60.0, 20.0), 3.0).unwrap();
        context.register(owner, POLL, sphere, |_, _| Ok(()), false).unwrap();
    }

    let mut total = 0;
    for step in 0..8 {
        let positions = walk(step);
        let expected = serial.update(&positions);
        let actual = parallel.update_parallel(&positions);

        assert_eq!(actual.evaluated, expected.evaluated);
        total += actual.fired();
        assert_eq!(sorted(actual.transitions), sorted(expected.transitions));
    }
    assert!(total > 0);
}

#[test]
fn test_parallel_counts_each_transition_once() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let (count, callback) = counter();
    context.register(owner, POLL, test_box(), callback, false).unwrap();

    let start = Instant::now();
    for step in 0..4 {
        context.update_parallel_at(start, &walk(step), 8);
    }

    let expected: usize = (0..32u64)
        .map(|id| {
            let states: Vec<bool> = (0..4).map(|step| (id as usize + step) % 4 < 2).collect();
            states.windows(2).filter(|w| w[0] != w[1]).count()
        })
        .sum();
    assert_eq!(count.load(Ordering::SeqCst) as usize, expected);
}

// ========== Debug ==========

#[test]
fn test_debug_flag_threaded_through() {
    let context = PositionEventsContext::default();
    let owner = context.register_owner("test");
    let shown = context.register(owner, POLL, test_box(), |_, _| Ok(()), true).unwrap();

    let regions = context.debug_regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].handle(), shown);
    assert!(regions[0].debug());
    assert_eq!(regions[0].shape(), &Shape::Box(test_box()));
}
