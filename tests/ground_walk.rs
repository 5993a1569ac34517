//! Tests for walking along chained footholds and off platform edges.
use ledge::{AxisInput, FootholdId, MoveAction};
use test_utils::{chain, flat, map_of, run_until, standing_on};

const DT: f64 = 1.0 / 60.0;

#[test]
fn walker_follows_a_chained_slope() {
    let lines = chain(1, 1, &[(0.0, 0.0), (100.0, 0.0), (200.0, -50.0)]);
    let map = map_of(lines.clone());
    let mut ctrl = standing_on(&lines[0], 90.0);

    let ticks = run_until(&mut ctrl, &map, DT, 300, |c| c.foothold_id() == Some(FootholdId(2)));
    assert!(ticks.is_none(), "walker moved without input");

    for _ in 0..30 {
        ctrl.walk(AxisInput::Positive, DT);
        ctrl.step(DT, &map);
    }
    assert_eq!(ctrl.foothold_id(), Some(FootholdId(2)));
    assert_eq!(ctrl.action(), MoveAction::Walk);
    let x = ctrl.position().x;
    assert!((ctrl.position().y - (-(x - 100.0) / 2.0)).abs() < 1e-9);
}

#[test]
fn walker_drops_off_an_edge_onto_a_lower_platform() {
    let upper = flat(1, 0.0, 100.0, 0.0);
    let lower = flat(2, -200.0, 400.0, 200.0);
    let map = map_of([upper, lower]);
    let mut ctrl = standing_on(&upper, 95.0);

    let mut left_upper = false;
    for _ in 0..240 {
        if ctrl.is_on_foothold() {
            ctrl.walk(AxisInput::Positive, DT);
        }
        ctrl.step(DT, &map);
        left_upper |= ctrl.is_airborne();
    }
    assert!(left_upper);
    assert_eq!(ctrl.foothold_id(), Some(FootholdId(2)));
    assert_eq!(ctrl.position().y, 200.0);
}

#[test]
fn walker_stops_at_an_edge_over_the_void() {
    let only = flat(1, 0.0, 100.0, 0.0);
    let map = map_of([only]);
    let mut ctrl = standing_on(&only, 95.0);
    for _ in 0..60 {
        ctrl.walk(AxisInput::Positive, DT);
        ctrl.step(DT, &map);
    }
    assert_eq!(ctrl.foothold_id(), Some(FootholdId(1)));
    assert_eq!(ctrl.position().x, 100.0);
}

#[test]
fn wall_link_blocks_the_walker() {
    let floor = flat(1, 0.0, 100.0, 0.0).linked(None, Some(FootholdId(2)));
    let wall = test_utils::foothold(2, (100.0, 0.0), (100.0, -100.0)).linked(Some(FootholdId(1)), None);
    let below = flat(3, -500.0, 500.0, 300.0);
    let map = map_of([floor, wall, below]);
    let mut ctrl = standing_on(&floor, 90.0);
    for _ in 0..60 {
        ctrl.walk(AxisInput::Positive, DT);
        ctrl.step(DT, &map);
    }
    assert_eq!(ctrl.foothold_id(), Some(FootholdId(1)));
    assert_eq!(ctrl.position().x, 100.0);
}
