//! Tests for foothold interpolation and support queries.
use ledge::{interpolate_y, Direction, FootholdId, FootholdQuery};
use rstest::rstest;
use test_utils::{chain, flat, foothold, map_of};

#[rstest]
#[case::first_dot(0.0, 0.0)]
#[case::midpoint(50.0, 25.0)]
#[case::second_dot(100.0, 50.0)]
fn interpolation_is_exact(#[case] x: f64, #[case] expected: f64) {
    let fh = foothold(1, (0.0, 0.0), (100.0, 50.0));
    assert_eq!(interpolate_y(&fh, x), expected);
}

#[rstest]
#[case(-1_000.0)]
#[case(10.0)]
#[case(f64::MAX)]
fn vertical_foothold_returns_first_dot(#[case] x: f64) {
    let wall = foothold(2, (10.0, 30.0), (10.0, 90.0));
    assert!(wall.is_wall());
    assert_eq!(wall.interpolate_y(x), 30.0);
}

#[test]
fn support_below_prefers_the_closest_surface() {
    let map = map_of([
        flat(1, -50.0, 50.0, 100.0),
        flat(2, -50.0, 50.0, 60.0),
        flat(3, 100.0, 200.0, 10.0),
    ]);
    let found = map.find_support_below(0.0, 0.0, 150.0, 10.0);
    assert_eq!(found.map(|fh| fh.id), Some(FootholdId(2)));
}

#[test]
fn support_slightly_above_is_accepted_within_tolerance() {
    let map = map_of([flat(1, -50.0, 50.0, 100.0)]);
    assert!(map.find_support_below(0.0, 108.0, 20.0, 10.0).is_some());
    assert!(map.find_support_below(0.0, 111.0, 20.0, 10.0).is_none());
}

#[test]
fn query_excludes_requested_foothold() {
    let map = map_of([flat(1, -50.0, 50.0, 100.0), flat(2, -50.0, 50.0, 140.0)]);
    let found = map.support_below(0.0, 90.0, 100.0, 0.0, Some(FootholdId(1)));
    assert_eq!(found.map(|fh| fh.id), Some(FootholdId(2)));
}

#[test]
fn chained_platform_links_both_ways() {
    let map = map_of(chain(1, 4, &[(0.0, 0.0), (50.0, 0.0), (100.0, 25.0)]));
    let right = map.neighbor_toward(FootholdId(1), Direction::Right);
    assert_eq!(right.map(|fh| fh.id), Some(FootholdId(2)));
    let left = map.neighbor_toward(FootholdId(2), Direction::Left);
    assert_eq!(left.map(|fh| fh.id), Some(FootholdId(1)));
    assert_eq!(map.platform(4).count(), 2);
}
