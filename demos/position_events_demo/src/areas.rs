//! The example areas

use position_events::prelude::*;
use std::time::Duration;

/// Map the example areas live on
pub const EXAMPLE_MAP: MapId = 15;

/// Poll interval requested for every example area
pub const EXAMPLE_POLL: Duration = Duration::from_millis(15);

const LAKE_SHORE: [(f64, f64); 14] = [
    (-83.0, 584.0),
    (-81.0, 626.0),
    (-24.0, 634.0),
    (52.0, 594.0),
    (85.0, 485.0),
    (195.0, 467.0),
    (208.0, 423.0),
    (157.0, 386.0),
    (152.0, 317.0),
    (56.0, 310.0),
    (18.0, 376.0),
    (22.0, 416.0),
    (-20.0, 438.0),
    (-29.0, 538.0),
];

fn log_transition(
    label: &'static str,
) -> impl Fn(&PositionData, bool) -> CallbackResult + Send + Sync + 'static {
    move |data: &PositionData, inside: bool| -> CallbackResult {
        if inside {
            log::info!("Area joined. ({} by {} at {:?})", label, data.subject, data.position);
        } else {
            log::info!("Area left. ({} by {} at {:?})", label, data.subject, data.position);
        }
        Ok(())
    }
}

/// The shapes of the example areas, by label
pub fn example_shapes() -> Result<Vec<(&'static str, Shape)>> {
    let test_box = BoxShape::new(Point3::new(50.0, 50.0, 10.0), Point3::new(60.0, 70.0, 40.0))?;
    let triangle = PrismShape::new(10.0, 0.0, [(0.0, 0.0), (15.0, 15.0), (15.0, -3.0)])?;
    let lake = PrismShape::new(50.0, 0.0, LAKE_SHORE)?;
    let shell = ShapeBuilder::new()
        .add(SphereShape::new(Point3::new(-20.0, -20.0, 20.0), 20.0)?)
        .subtract(SphereShape::new(Point3::new(-23.0, -26.0, 23.0), 8.0)?)
        .build()?;

    Ok(vec![
        ("test box", test_box.into()),
        ("triangle", triangle.into()),
        ("lake", lake.into()),
        ("hollow sphere", shell),
    ])
}

/// Register every example area on behalf of `scope`
pub fn register_example_areas(scope: &OwnerScope) -> Result<Vec<RegionHandle>> {
    example_shapes()?
        .into_iter()
        .map(|(label, shape)| {
            let desc = scope
                .describe(EXAMPLE_POLL, shape, log_transition(label))
                .on_map(EXAMPLE_MAP)
                .with_label(label);
            scope.register_region(desc)
        })
        .collect()
}
