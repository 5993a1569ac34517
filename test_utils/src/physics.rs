//! Convenience constructors for footholds, maps and controllers used in
//! tests.

use std::sync::Arc;

use glam::DVec2;
use ledge::{FootholdId, FootholdLine, FootholdMap, FootholdQuery, MotionController, PhysicsConstants};

/// Plain 2D coordinates accepted by the fixture constructors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coords2D {
    pub x: f64,
    pub y: f64,
}

impl Coords2D {
    /// Create new 2D coordinates.
    ///
    /// # Examples
    /// ```
    /// use test_utils::physics::Coords2D;
    /// let c = Coords2D::new(1.0, 2.0);
    /// assert_eq!(c.y, 2.0);
    /// ```
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Foothold between two points.
///
/// # Examples
/// ```
/// use test_utils::physics::foothold;
/// let fh = foothold(1, (0.0, 0.0), (100.0, 50.0));
/// assert_eq!(fh.interpolate_y(50.0), 25.0);
/// ```
pub fn foothold<I, A, B>(id: I, first: A, second: B) -> FootholdLine
where
    I: Into<FootholdId>,
    A: Into<Coords2D>,
    B: Into<Coords2D>,
{
    let first: DVec2 = first.into().into();
    let second: DVec2 = second.into().into();
    FootholdLine::new(id.into(), first, second)
}

/// Horizontal foothold from `x1` to `x2` at height `y`.
pub fn flat(id: i32, x1: f64, x2: f64, y: f64) -> FootholdLine {
    foothold(id, (x1, y), (x2, y))
}

/// Linked footholds through `points`, numbered from `first_id`.
///
/// # Examples
/// ```
/// use ledge::FootholdId;
/// use test_utils::physics::chain;
/// let lines = chain(10, 1, &[(0.0, 0.0), (50.0, 0.0), (100.0, 20.0)]);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].next, Some(FootholdId(11)));
/// assert_eq!(lines[1].prev, Some(FootholdId(10)));
/// ```
pub fn chain(first_id: i32, platform: i32, points: &[(f64, f64)]) -> Vec<FootholdLine> {
    let count = points.len().saturating_sub(1);
    let last_id = first_id + i32::try_from(count).unwrap_or(i32::MAX) - 1;
    points
        .windows(2)
        .zip(first_id..)
        .map(|(pair, id)| {
            let prev = (id > first_id).then_some(FootholdId(id - 1));
            let next = (id < last_id).then_some(FootholdId(id + 1));
            foothold(id, pair[0], pair[1])
                .on_platform(platform)
                .linked(prev, next)
        })
        .collect()
}

/// Map holding `lines`.
pub fn map_of(lines: impl IntoIterator<Item = FootholdLine>) -> FootholdMap {
    lines.into_iter().collect()
}

/// Shared default constants.
pub fn default_constants() -> Arc<PhysicsConstants> {
    Arc::new(PhysicsConstants::default())
}

/// Airborne controller at `coords` with default constants.
pub fn controller_at<C: Into<Coords2D>>(coords: C) -> MotionController {
    MotionController::at(default_constants(), coords.into().into())
}

/// Controller standing on `line` at `x`.
pub fn standing_on(line: &FootholdLine, x: f64) -> MotionController {
    let mut ctrl = MotionController::at(default_constants(), DVec2::new(x, line.interpolate_y(x)));
    ctrl.land_on_foothold(line);
    ctrl
}

/// Steps `ctrl` against `map` until `done` holds, giving up after
/// `max_ticks`. Returns the number of ticks taken.
pub fn run_until(
    ctrl: &mut MotionController,
    map: &impl FootholdQuery,
    dt: f64,
    max_ticks: usize,
    mut done: impl FnMut(&MotionController) -> bool,
) -> Option<usize> {
    for tick in 1..=max_ticks {
        ctrl.step(dt, map);
        if done(ctrl) {
            return Some(tick);
        }
    }
    None
}
