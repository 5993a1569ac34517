use std::sync::Arc;

use approx::assert_relative_eq;
use glam::DVec2;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::constants::{JUMP_DOWN_SPEED, MOVING_SPEED_THRESHOLD};
use crate::foothold::{FootholdLine, MockFootholdQuery};

const DT: f64 = 1.0 / 60.0;

#[fixture]
fn constants() -> Arc<PhysicsConstants> {
    Arc::new(PhysicsConstants::default())
}

fn flat(id: i32, x1: f64, x2: f64, y: f64) -> FootholdLine {
    FootholdLine::new(FootholdId(id), DVec2::new(x1, y), DVec2::new(x2, y))
}

fn standing_on(constants: Arc<PhysicsConstants>, line: &FootholdLine, x: f64) -> MotionController {
    let mut ctrl = MotionController::at(constants, DVec2::new(x, 0.0));
    ctrl.land_on_foothold(line);
    ctrl
}

fn map_with(line: FootholdLine) -> MockFootholdQuery {
    let mut map = MockFootholdQuery::new();
    map.expect_foothold()
        .with(eq(line.id))
        .returning(move |_| Some(line));
    map
}

#[rstest]
#[case::first_hit(0.0, -300.0, -300.0)]
#[case::same_direction_is_capped(-300.0, -400.0, -400.0)]
#[case::weaker_same_direction_ignored(-300.0, -200.0, -300.0)]
#[case::opposite_direction_cancels(-300.0, 200.0, -100.0)]
#[case::zero_keeps_queued(150.0, 0.0, 150.0)]
fn impacts_accumulate_with_clamping(
    #[case] queued: f64,
    #[case] incoming: f64,
    #[case] expected: f64,
) {
    assert_relative_eq!(accumulate_impact(queued, incoming), expected);
}

#[rstest]
fn queued_impact_is_applied_once(constants: Arc<PhysicsConstants>) {
    let line = flat(1, 0.0, 100.0, 50.0);
    let mut ctrl = standing_on(constants, &line, 50.0);
    ctrl.set_wings(true);
    ctrl.set_impact_next(-200.0, 0.0);
    ctrl.set_impact_next(-250.0, 0.0);
    assert!(!ctrl.has_wings());
    assert_eq!(ctrl.pending_impact(), Some(DVec2::new(-250.0, 0.0)));

    ctrl.update(DT);
    assert!(ctrl.pending_impact().is_none());
    assert!(ctrl.is_on_foothold());
    assert_eq!(ctrl.knockback_range(), Some((0.0, 100.0)));
    assert_relative_eq!(ctrl.velocity().x, -250.0);
}

#[rstest]
fn vertical_queued_impact_knocks_off_foothold(constants: Arc<PhysicsConstants>) {
    let line = flat(1, 0.0, 100.0, 50.0);
    let mut ctrl = standing_on(constants, &line, 50.0);
    ctrl.set_impact_next(100.0, -300.0);
    ctrl.apply_pending_impact();
    assert!(ctrl.is_airborne());
    assert_eq!(ctrl.fall_start(), Some(FootholdId(1)));
    assert_eq!(ctrl.jump_state(), JumpState::Falling);
    assert!(ctrl.is_in_knockback());
}

#[rstest]
fn upward_impact_bounds_by_former_foothold(constants: Arc<PhysicsConstants>) {
    let line = flat(1, -20.0, 40.0, 10.0);
    let mut ctrl = standing_on(constants, &line, 0.0);
    ctrl.impact(-500.0, -200.0);
    assert!(ctrl.is_airborne());
    assert_eq!(ctrl.knockback_range(), Some((-20.0, 40.0)));
    for _ in 0..10 {
        ctrl.update(DT);
        assert!(ctrl.position().x >= -20.0);
    }
}

#[rstest]
fn airborne_impact_has_no_bounds(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::new(constants);
    ctrl.impact(300.0, 0.0);
    assert!(!ctrl.is_in_knockback());
    assert_eq!(ctrl.velocity(), DVec2::new(300.0, 0.0));
}

#[rstest]
fn jump_requires_support(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::new(constants);
    assert!(!ctrl.jump());
    assert_eq!(ctrl.velocity(), DVec2::ZERO);
}

#[rstest]
fn jump_leaves_foothold_upward(constants: Arc<PhysicsConstants>) {
    let line = flat(3, 0.0, 100.0, 0.0);
    let mut ctrl = standing_on(Arc::clone(&constants), &line, 10.0);
    ctrl.impact(0.0, 0.0);
    assert!(ctrl.jump());
    assert!(ctrl.is_airborne());
    assert!(!ctrl.is_in_knockback());
    assert_relative_eq!(ctrl.velocity().y, -constants.tunables().jump_speed);
    assert_eq!(ctrl.jump_state(), JumpState::Jumping);
    assert_eq!(ctrl.fall_start(), Some(FootholdId(3)));
}

#[rstest]
fn jump_down_only_from_ground(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::new(Arc::clone(&constants));
    assert!(!ctrl.jump_down());

    let line = flat(4, 0.0, 100.0, 0.0);
    let mut grounded = standing_on(constants, &line, 10.0);
    assert!(grounded.jump_down());
    assert!(grounded.is_jumping_down());
    assert_relative_eq!(grounded.velocity().y, JUMP_DOWN_SPEED);
}

#[rstest]
fn ladder_clamps_to_its_span(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::at(constants, DVec2::new(3.0, 50.0));
    ctrl.grab_ladder(10.0, 100.0, 0.0, LadderKind::Rope);
    assert!(ctrl.is_on_rope());
    assert!(ctrl.foothold_id().is_none());

    ctrl.climb(AxisInput::Negative);
    ctrl.update(1.0);
    assert_eq!(ctrl.position(), DVec2::new(10.0, 0.0));
    assert_relative_eq!(ctrl.velocity().y, 0.0);
    assert_eq!(ctrl.action(), MoveAction::Stand);

    ctrl.climb(AxisInput::Positive);
    ctrl.update(DT);
    assert_eq!(ctrl.action(), MoveAction::Rope);
}

#[rstest]
fn ground_walk_follows_slope(constants: Arc<PhysicsConstants>) {
    let slope = FootholdLine::new(
        FootholdId(9),
        DVec2::new(0.0, 0.0),
        DVec2::new(100.0, 50.0),
    );
    let mut ctrl = standing_on(constants, &slope, 0.0);
    ctrl.set_velocity(DVec2::new(60.0, 0.0));
    ctrl.update(0.5);
    assert_relative_eq!(ctrl.position().x, 30.0);
    assert_relative_eq!(ctrl.position().y, 15.0);
    assert_eq!(ctrl.action(), MoveAction::Walk);

    ctrl.set_velocity(DVec2::new(MOVING_SPEED_THRESHOLD, 0.0));
    ctrl.update(DT);
    assert_eq!(ctrl.action(), MoveAction::Stand);
}

#[rstest]
fn walk_input_turns_unless_flip_disabled(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::new(constants);
    ctrl.walk(AxisInput::Negative, DT);
    assert_eq!(ctrl.facing(), Direction::Left);
    assert!(ctrl.velocity().x < 0.0);

    ctrl.set_no_flip(true);
    ctrl.walk(AxisInput::Positive, DT);
    assert_eq!(ctrl.facing(), Direction::Left);
}

#[rstest]
#[case::nothing(false, false, false, FloatMode::Normal)]
#[case::wings(false, false, true, FloatMode::Wings)]
#[case::swim_over_wings(false, true, true, FloatMode::Swimming)]
#[case::fly_over_everything(true, true, true, FloatMode::Flying)]
fn float_mode_priority(
    constants: Arc<PhysicsConstants>,
    #[case] flying: bool,
    #[case] swimming: bool,
    #[case] wings: bool,
    #[case] expected: FloatMode,
) {
    let mut ctrl = MotionController::new(constants);
    ctrl.set_flying_ability(flying);
    ctrl.set_in_swim_area(swimming);
    ctrl.set_wings(wings);
    assert_eq!(ctrl.float_mode(), expected);
}

#[rstest]
fn wings_slow_the_fall(constants: Arc<PhysicsConstants>) {
    let mut plain = MotionController::new(Arc::clone(&constants));
    let mut winged = MotionController::new(constants);
    winged.set_wings(true);
    plain.update(DT);
    winged.update(DT);
    assert_relative_eq!(winged.velocity().y, plain.velocity().y * 0.3);
}

#[rstest]
fn swimming_sinks_gently_and_labels_swim(constants: Arc<PhysicsConstants>) {
    let swim_cap = constants.tunables().swim_speed * 0.3;
    let mut ctrl = MotionController::new(constants);
    ctrl.set_in_swim_area(true);
    for _ in 0..120 {
        ctrl.update(DT);
        assert!(ctrl.velocity().y <= swim_cap);
    }
    assert!(ctrl.velocity().y > 0.0);
    assert_eq!(ctrl.action(), MoveAction::Swim);
}

#[rstest]
fn idle_flyer_sinks_like_a_swimmer(constants: Arc<PhysicsConstants>) {
    let fly_speed = constants.tunables().fly_speed;
    let mut ctrl = MotionController::new(constants);
    ctrl.set_flying(true);
    ctrl.update(DT);
    let expected = fly_speed * 3.0 * DT * 0.3 * (1.0 - 2.0 * DT);
    assert_relative_eq!(ctrl.velocity().y, expected);
    assert!(ctrl.velocity().y > 8.0);
    assert_eq!(ctrl.action(), MoveAction::Fly);
}

#[rstest]
fn walking_uses_the_derived_walk_rates(constants: Arc<PhysicsConstants>) {
    let acceleration = constants.walk_acceleration();
    let line = flat(1, 0.0, 1000.0, 0.0);
    let mut ctrl = standing_on(constants, &line, 50.0);
    ctrl.walk(AxisInput::Positive, 0.001);
    assert_relative_eq!(ctrl.velocity().x, acceleration * 0.001);
    assert_eq!(ctrl.facing(), Direction::Right);
}

#[rstest]
fn flying_is_clamped_to_map_bounds(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::at(constants, DVec2::new(95.0, 0.0));
    ctrl.set_flying(true);
    ctrl.set_map_bounds(MapBounds::new(0.0, -100.0, 100.0, 100.0));
    ctrl.set_velocity(DVec2::new(600.0, 0.0));
    ctrl.update(0.1);
    assert_relative_eq!(ctrl.position().x, 100.0);
    assert_relative_eq!(ctrl.velocity().x, 0.0);
    assert_eq!(ctrl.action(), MoveAction::Fly);
}

#[rstest]
fn float_state_restores_pre_collision_position(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::at(constants, DVec2::new(5.0, 5.0));
    ctrl.set_flying(true);
    ctrl.set_velocity(DVec2::new(60.0, 0.0));
    ctrl.update(0.5);
    assert!(ctrl.restore_float_state());
    assert_eq!(ctrl.position(), DVec2::new(5.0, 5.0));
    assert!(!ctrl.restore_float_state());
}

#[rstest]
fn reset_keeps_bounds(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::at(constants, DVec2::new(5.0, 5.0));
    let bounds = MapBounds::new(0.0, 0.0, 10.0, 10.0);
    ctrl.set_map_bounds(bounds);
    ctrl.set_flying(true);
    ctrl.start_path_recording(0);
    ctrl.reset();
    assert_eq!(ctrl.position(), DVec2::ZERO);
    assert!(!ctrl.is_user_flying());
    assert!(!ctrl.is_recording_path());
    assert_eq!(ctrl.map_bounds(), bounds);
}

#[rstest]
fn vanished_foothold_detaches(constants: Arc<PhysicsConstants>) {
    let line = flat(5, 0.0, 100.0, 0.0);
    let mut ctrl = standing_on(constants, &line, 50.0);
    let mut map = MockFootholdQuery::new();
    map.expect_foothold().returning(|_| None);
    map.expect_support_below().returning(|_, _, _, _, _| None);
    ctrl.step(DT, &map);
    assert!(ctrl.is_airborne());
    assert_eq!(ctrl.fall_start(), Some(FootholdId(5)));
}

#[rstest]
fn linked_neighbor_carries_walker(constants: Arc<PhysicsConstants>) {
    let here = flat(1, 0.0, 100.0, 0.0).linked(None, Some(FootholdId(2)));
    let next = FootholdLine::new(FootholdId(2), DVec2::new(100.0, 0.0), DVec2::new(200.0, -50.0));
    let mut ctrl = standing_on(constants, &here, 99.0);
    ctrl.set_velocity(DVec2::new(120.0, 0.0));

    let mut map = map_with(here);
    map.expect_neighbor_toward()
        .with(eq(FootholdId(1)), eq(Direction::Right))
        .returning(move |_, _| Some(next));
    ctrl.step(0.1, &map);

    assert_eq!(ctrl.foothold_id(), Some(FootholdId(2)));
    assert_relative_eq!(ctrl.position().y, next.interpolate_y(ctrl.position().x));
}

#[rstest]
fn wall_neighbor_blocks(constants: Arc<PhysicsConstants>) {
    let here = flat(1, 0.0, 100.0, 0.0).linked(Some(FootholdId(7)), None);
    let wall = FootholdLine::new(FootholdId(7), DVec2::new(0.0, 0.0), DVec2::new(0.0, -80.0));
    let mut ctrl = standing_on(constants, &here, 1.0);
    ctrl.set_velocity(DVec2::new(-120.0, 0.0));

    let mut map = map_with(here);
    map.expect_neighbor_toward().returning(move |_, _| Some(wall));
    ctrl.step(0.1, &map);

    assert_eq!(ctrl.foothold_id(), Some(FootholdId(1)));
    assert_relative_eq!(ctrl.position().x, 0.0);
    assert_relative_eq!(ctrl.velocity().x, 0.0);
}

#[rstest]
fn unlinked_edge_over_ground_lets_walker_fall(constants: Arc<PhysicsConstants>) {
    let here = flat(1, 0.0, 100.0, 0.0);
    let below = flat(2, 50.0, 300.0, 200.0);
    let mut ctrl = standing_on(constants, &here, 99.0);
    ctrl.set_velocity(DVec2::new(120.0, 0.0));

    let mut map = map_with(here);
    map.expect_neighbor_toward().returning(|_, _| None);
    map.expect_support_below()
        .withf(|_, _, range, _, exclude| *range < 100.0 && *exclude == Some(FootholdId(1)))
        .returning(|_, _, _, _, _| None);
    map.expect_support_below()
        .withf(|_, _, range, _, _| *range >= 100.0)
        .returning(move |_, _, _, _, _| Some(below));
    ctrl.step(0.1, &map);

    assert!(ctrl.is_airborne());
    assert_eq!(ctrl.fall_start(), Some(FootholdId(1)));
}

#[rstest]
fn unlinked_edge_over_void_clamps(constants: Arc<PhysicsConstants>) {
    let here = flat(1, 0.0, 100.0, 0.0);
    let mut ctrl = standing_on(constants, &here, 99.0);
    ctrl.set_velocity(DVec2::new(120.0, 0.0));

    let mut map = map_with(here);
    map.expect_neighbor_toward().returning(|_, _| None);
    map.expect_support_below().returning(|_, _, _, _, _| None);
    ctrl.step(0.1, &map);

    assert_eq!(ctrl.foothold_id(), Some(FootholdId(1)));
    assert_relative_eq!(ctrl.position().x, 100.0);
    assert_relative_eq!(ctrl.velocity().x, 0.0);
}

#[rstest]
fn jumping_down_skips_the_platform_left(constants: Arc<PhysicsConstants>) {
    let here = flat(1, 0.0, 100.0, 0.0);
    let mut ctrl = standing_on(constants, &here, 50.0);
    assert!(ctrl.jump_down());

    let mut map = MockFootholdQuery::new();
    map.expect_support_below()
        .withf(|_, _, _, _, exclude| *exclude == Some(FootholdId(1)))
        .times(1)
        .returning(|_, _, _, _, _| None);
    ctrl.step(DT, &map);
    assert!(ctrl.is_airborne());
}

#[rstest]
fn falling_entity_lands_within_search_range(constants: Arc<PhysicsConstants>) {
    let ground = flat(8, -50.0, 50.0, 100.0);
    let mut ctrl = MotionController::at(constants, DVec2::new(0.0, 85.0));
    ctrl.set_velocity(DVec2::new(0.0, 300.0));

    let mut map = MockFootholdQuery::new();
    map.expect_support_below()
        .withf(|_, _, _, _, exclude| exclude.is_none())
        .returning(move |_, _, _, _, _| Some(ground));
    ctrl.step(DT, &map);

    assert_eq!(ctrl.foothold_id(), Some(FootholdId(8)));
    assert_relative_eq!(ctrl.position().y, 100.0);
    assert_relative_eq!(ctrl.velocity().y, 0.0);
    assert_eq!(ctrl.jump_state(), JumpState::None);
}

#[rstest]
fn flying_entity_never_lands(constants: Arc<PhysicsConstants>) {
    let mut ctrl = MotionController::at(constants, DVec2::new(0.0, 85.0));
    ctrl.set_flying_map(true);
    ctrl.set_velocity(DVec2::new(0.0, 300.0));
    let map = MockFootholdQuery::new();
    ctrl.step(DT, &map);
    assert!(ctrl.is_airborne());
}

#[rstest]
fn forbid_fall_down_refuses_drop(constants: Arc<PhysicsConstants>) {
    let mut here = flat(1, 0.0, 100.0, 0.0);
    here.forbid_fall_down = true;
    let mut ctrl = standing_on(constants, &here, 50.0);
    let map = map_with(here);
    assert!(!ctrl.jump_down_on(&map));
    assert!(ctrl.is_on_foothold());
}

#[rstest]
fn path_elements_truncate_state(constants: Arc<PhysicsConstants>) {
    let here = flat(12, 0.0, 100.0, 40.0);
    let mut ctrl = standing_on(constants, &here, 10.9);
    ctrl.set_velocity(DVec2::new(-3.7, 0.0));
    ctrl.set_facing(Direction::Left);
    let element = ctrl.make_new_move_path_elem(1234);
    assert_eq!((element.x, element.y), (10, 40));
    assert_eq!(element.vx, -3);
    assert_eq!(element.foothold_id, 12);
    assert_eq!(element.timestamp_ms, 1234);
    assert!(!element.facing_right);
}
