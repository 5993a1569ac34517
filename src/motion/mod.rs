//! Per-entity kinematic state machine.
//!
//! A [`MotionController`] owns the position, velocity and support of one
//! simulated entity. Support is a tagged union so an entity is grounded, on
//! a ladder or rope, or airborne, and never more than one of these. The
//! command methods perform the explicit transitions between them;
//! [`MotionController::update`] advances the state by a caller-supplied
//! time delta and [`MotionController::step`] additionally consults foothold
//! geometry for edge transitions and landing.

mod contact;
mod float;
mod update;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use glam::DVec2;
use log::debug;
use serde::Serialize;

pub use float::FloatMode;

use crate::config::PhysicsConstants;
use crate::constants::{IMPACT_DETACH_SPEED, JUMP_DOWN_SPEED};
use crate::foothold::{Direction, FootholdId, FootholdLine, MapBounds, Segment};
use crate::move_path::{MovePathElement, MovePathRecorder};
use crate::numeric::{truncate_to_i16, truncate_to_i32};
use crate::physics::{speed_step, walk_speed_step, AxisInput, MotionParams};

/// Animation-facing action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// Standing still or barely moving.
    #[default]
    Stand,
    /// Walking along a foothold.
    Walk,
    /// Airborne and rising.
    Jump,
    /// Airborne and falling.
    Fall,
    /// Climbing a ladder.
    Ladder,
    /// Climbing a rope. Kept apart from [`MoveAction::Ladder`] so animation
    /// can tell the two climbables apart; consumers that only know one
    /// climbing label should treat both alike.
    Rope,
    /// Swimming.
    Swim,
    /// Flying.
    Fly,
}

/// Vertical phase of an airborne entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpState {
    /// Not airborne.
    #[default]
    None,
    /// Moving upward.
    Jumping,
    /// Moving downward.
    Falling,
}

/// Kind of climbable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderKind {
    /// A ladder.
    Ladder,
    /// A rope.
    Rope,
}

impl LadderKind {
    const fn action(self) -> MoveAction {
        match self {
            Self::Ladder => MoveAction::Ladder,
            Self::Rope => MoveAction::Rope,
        }
    }
}

/// Position and extent of the ladder or rope being climbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderGrip {
    /// X coordinate the climber is pinned to.
    pub x: f64,
    /// Smallest reachable Y.
    pub top: f64,
    /// Largest reachable Y.
    pub bottom: f64,
    /// Ladder or rope.
    pub kind: LadderKind,
}

/// Foothold the entity stands on, with a cached copy of its segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Foothold id.
    pub id: FootholdId,
    /// Segment as last read from the map.
    pub segment: Segment,
}

/// What currently holds the entity up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Support {
    /// Standing on a foothold.
    Grounded(Contact),
    /// Holding a ladder or rope.
    Ladder(LadderGrip),
    /// Neither; gravity or float physics apply.
    #[default]
    Airborne,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Knockback {
    min_x: f64,
    max_x: f64,
    remaining: f64,
}

impl Knockback {
    fn spanning(segment: &Segment, duration: f64) -> Self {
        Self {
            min_x: segment.min_x(),
            max_x: segment.max_x(),
            remaining: duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct FloatFlags {
    flying: bool,
    flying_map: bool,
    flying_ability: bool,
    in_swim_area: bool,
    wings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatSnapshot {
    position: DVec2,
    velocity: DVec2,
}

/// Kinematic state of one simulated entity.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ledge::{MotionController, PhysicsConstants};
/// let mut ctrl = MotionController::new(Arc::new(PhysicsConstants::default()));
/// ctrl.update(1.0 / 60.0);
/// assert!(ctrl.velocity().y > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct MotionController {
    constants: Arc<PhysicsConstants>,
    position: DVec2,
    velocity: DVec2,
    support: Support,
    fall_start: Option<FootholdId>,
    jumping_down: bool,
    pending_impact: Option<DVec2>,
    knockback: Option<Knockback>,
    action: MoveAction,
    jump_state: JumpState,
    facing: Direction,
    no_flip: bool,
    flags: FloatFlags,
    bounds: MapBounds,
    float_snapshot: Option<FloatSnapshot>,
    path: MovePathRecorder,
}

impl MotionController {
    /// Creates a standing, unsupported controller at the origin.
    #[must_use]
    pub fn new(constants: Arc<PhysicsConstants>) -> Self {
        Self {
            constants,
            position: DVec2::ZERO,
            velocity: DVec2::ZERO,
            support: Support::Airborne,
            fall_start: None,
            jumping_down: false,
            pending_impact: None,
            knockback: None,
            action: MoveAction::Stand,
            jump_state: JumpState::None,
            facing: Direction::Right,
            no_flip: false,
            flags: FloatFlags::default(),
            bounds: MapBounds::UNBOUNDED,
            float_snapshot: None,
            path: MovePathRecorder::default(),
        }
    }

    /// Creates a controller at `position`.
    #[must_use]
    pub fn at(constants: Arc<PhysicsConstants>, position: DVec2) -> Self {
        let mut ctrl = Self::new(constants);
        ctrl.position = position;
        ctrl
    }

    /// Constants this controller was built with.
    #[must_use]
    pub fn constants(&self) -> &PhysicsConstants {
        &self.constants
    }

    /// Restores the freshly constructed state, keeping constants and map
    /// bounds.
    pub fn reset(&mut self) {
        let bounds = self.bounds;
        *self = Self::new(Arc::clone(&self.constants));
        self.bounds = bounds;
    }

    // ----- queries -----

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Current velocity in px/s.
    #[must_use]
    pub const fn velocity(&self) -> DVec2 {
        self.velocity
    }

    /// Current support.
    #[must_use]
    pub const fn support(&self) -> &Support {
        &self.support
    }

    /// Foothold contact, if grounded.
    #[must_use]
    pub const fn contact(&self) -> Option<&Contact> {
        match &self.support {
            Support::Grounded(contact) => Some(contact),
            _ => None,
        }
    }

    /// Id of the supporting foothold, if grounded.
    #[must_use]
    pub fn foothold_id(&self) -> Option<FootholdId> {
        self.contact().map(|contact| contact.id)
    }

    /// Ladder or rope being climbed.
    #[must_use]
    pub const fn ladder(&self) -> Option<&LadderGrip> {
        match &self.support {
            Support::Ladder(grip) => Some(grip),
            _ => None,
        }
    }

    /// Foothold the entity last left by jumping, dropping or falling off.
    #[must_use]
    pub const fn fall_start(&self) -> Option<FootholdId> {
        self.fall_start
    }

    /// Current action label.
    #[must_use]
    pub const fn action(&self) -> MoveAction {
        self.action
    }

    /// Current jump state label.
    #[must_use]
    pub const fn jump_state(&self) -> JumpState {
        self.jump_state
    }

    /// Facing direction.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Whether the entity stands on a foothold.
    #[must_use]
    pub const fn is_on_foothold(&self) -> bool {
        matches!(self.support, Support::Grounded(_))
    }

    /// Whether the entity holds a ladder or rope.
    #[must_use]
    pub const fn is_on_ladder_or_rope(&self) -> bool {
        matches!(self.support, Support::Ladder(_))
    }

    /// Whether the entity holds a ladder.
    #[must_use]
    pub const fn is_on_ladder(&self) -> bool {
        matches!(
            self.support,
            Support::Ladder(LadderGrip {
                kind: LadderKind::Ladder,
                ..
            })
        )
    }

    /// Whether the entity holds a rope.
    #[must_use]
    pub const fn is_on_rope(&self) -> bool {
        matches!(
            self.support,
            Support::Ladder(LadderGrip {
                kind: LadderKind::Rope,
                ..
            })
        )
    }

    /// Whether the entity has no support.
    #[must_use]
    pub const fn is_airborne(&self) -> bool {
        matches!(self.support, Support::Airborne)
    }

    /// Whether the entity is off the ground and moving down.
    #[must_use]
    pub fn is_falling(&self) -> bool {
        !self.is_on_foothold() && self.velocity.y > 0.0
    }

    /// Whether the entity is falling without any control.
    #[must_use]
    pub fn is_free_falling(&self) -> bool {
        self.is_airborne() && !self.flags.flying && self.velocity.y > 0.0
    }

    /// Whether both velocity components are negligible.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.velocity.x.abs() < 0.001 && self.velocity.y.abs() < 0.001
    }

    /// Whether the entity is inside a swim area.
    #[must_use]
    pub const fn is_swimming(&self) -> bool {
        self.flags.in_swim_area
    }

    /// Whether any flying source is active.
    #[must_use]
    pub const fn is_user_flying(&self) -> bool {
        self.flags.flying || self.flags.flying_map || self.flags.flying_ability
    }

    /// Whether the wings slow-fall modifier is active.
    #[must_use]
    pub const fn has_wings(&self) -> bool {
        self.flags.wings
    }

    /// Whether a drop through the platform is in progress.
    #[must_use]
    pub const fn is_jumping_down(&self) -> bool {
        self.jumping_down
    }

    /// Whether horizontal motion is currently bounded by a knockback.
    #[must_use]
    pub const fn is_in_knockback(&self) -> bool {
        self.knockback.is_some()
    }

    /// Horizontal range allowed by the active knockback.
    #[must_use]
    pub fn knockback_range(&self) -> Option<(f64, f64)> {
        self.knockback.map(|kb| (kb.min_x, kb.max_x))
    }

    /// Seconds left on the active knockback.
    #[must_use]
    pub fn knockback_remaining(&self) -> Option<f64> {
        self.knockback.map(|kb| kb.remaining)
    }

    /// Impulse queued for the next update.
    #[must_use]
    pub const fn pending_impact(&self) -> Option<DVec2> {
        self.pending_impact
    }

    /// Map boundary used for floating entities.
    #[must_use]
    pub const fn map_bounds(&self) -> MapBounds {
        self.bounds
    }

    // ----- setters -----

    /// Moves the entity without touching its support.
    pub const fn set_position(&mut self, position: DVec2) {
        self.position = position;
    }

    /// Overwrites the velocity.
    pub const fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }

    /// Sets the facing direction.
    pub const fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Stops walk input from turning the entity.
    pub const fn set_no_flip(&mut self, no_flip: bool) {
        self.no_flip = no_flip;
    }

    /// Sets the flying flag (mount or skill in use).
    pub const fn set_flying(&mut self, flying: bool) {
        self.flags.flying = flying;
    }

    /// Marks the current map as a free-flying map.
    pub const fn set_flying_map(&mut self, flying_map: bool) {
        self.flags.flying_map = flying_map;
    }

    /// Grants or removes the ability to fly.
    pub const fn set_flying_ability(&mut self, ability: bool) {
        self.flags.flying_ability = ability;
    }

    /// Marks the entity as inside or outside a swim area.
    pub const fn set_in_swim_area(&mut self, in_swim_area: bool) {
        self.flags.in_swim_area = in_swim_area;
    }

    /// Enables or disables the wings slow-fall modifier.
    pub const fn set_wings(&mut self, wings: bool) {
        self.flags.wings = wings;
    }

    /// Sets the rectangle that bounds floating entities.
    pub const fn set_map_bounds(&mut self, bounds: MapBounds) {
        self.bounds = bounds;
    }

    // ----- regime transitions -----

    /// Jumps off the current foothold, ladder or rope.
    ///
    /// Returns `false` and does nothing while airborne.
    pub fn jump(&mut self) -> bool {
        let from = match self.support {
            Support::Grounded(contact) => Some(contact.id),
            Support::Ladder(_) => None,
            Support::Airborne => return false,
        };
        self.velocity.y = -self.constants.tunables().jump_speed;
        self.fall_start = from;
        self.support = Support::Airborne;
        self.jump_state = JumpState::Jumping;
        self.action = MoveAction::Jump;
        self.knockback = None;
        debug!("jump from {from:?} at {}", self.position);
        true
    }

    /// Drops through the current foothold.
    ///
    /// Landing on the foothold just left is suppressed until the entity
    /// lands elsewhere. Returns `false` unless grounded.
    pub fn jump_down(&mut self) -> bool {
        let Support::Grounded(contact) = self.support else {
            return false;
        };
        self.fall_start = Some(contact.id);
        self.support = Support::Airborne;
        self.jumping_down = true;
        self.velocity.y = JUMP_DOWN_SPEED;
        self.jump_state = JumpState::Falling;
        self.action = MoveAction::Fall;
        self.knockback = None;
        debug!("jump down through {}", contact.id);
        true
    }

    /// Stands on `line`, snapping Y onto its surface.
    pub fn land_on_foothold(&mut self, line: &FootholdLine) {
        self.support = Support::Grounded(Contact {
            id: line.id,
            segment: line.segment,
        });
        self.fall_start = None;
        self.velocity.y = 0.0;
        self.jump_state = JumpState::None;
        self.jumping_down = false;
        self.knockback = None;
        self.position.y = line.interpolate_y(self.position.x);
        debug!("landed on {} at {}", line.id, self.position);
    }

    /// Starts climbing the ladder or rope at `x` spanning `top..=bottom`.
    pub fn grab_ladder(&mut self, x: f64, top: f64, bottom: f64, kind: LadderKind) {
        self.support = Support::Ladder(LadderGrip {
            x,
            top: top.min(bottom),
            bottom: top.max(bottom),
            kind,
        });
        self.velocity.x = 0.0;
        self.action = kind.action();
        self.jump_state = JumpState::None;
        self.jumping_down = false;
        self.fall_start = None;
        self.knockback = None;
        debug!("grabbed {kind:?} at x={x}");
    }

    /// Lets go of the ladder or rope. Returns `false` if not climbing.
    pub const fn release_ladder(&mut self) -> bool {
        if !self.is_on_ladder_or_rope() {
            return false;
        }
        self.support = Support::Airborne;
        self.jump_state = JumpState::Falling;
        self.action = MoveAction::Fall;
        true
    }

    /// Leaves the current foothold without any velocity change.
    ///
    /// Returns `false` unless grounded.
    pub fn detach_from_foothold(&mut self) -> bool {
        let Support::Grounded(contact) = self.support else {
            return false;
        };
        self.fall_start = Some(contact.id);
        self.support = Support::Airborne;
        self.jump_state = JumpState::Falling;
        self.action = MoveAction::Fall;
        debug!("detached from {}", contact.id);
        true
    }

    /// Leaves the current foothold, optionally starting with a downward
    /// speed. Non-positive speeds keep the current velocity.
    pub fn fall_down(&mut self, initial_vy: f64) {
        self.detach_from_foothold();
        if initial_vy > 0.0 {
            self.velocity.y = initial_vy;
        }
    }

    /// Overwrites the velocity with a hard knockback.
    ///
    /// Disables wings. An upward impact detaches the entity from its
    /// foothold. If the entity was grounded, its horizontal motion is then
    /// bounded by that foothold's span for the knockback duration.
    pub fn impact(&mut self, vx: f64, vy: f64) {
        self.velocity = DVec2::new(vx, vy);
        self.flags.wings = false;
        let former = self.contact().copied();
        if vy < 0.0 {
            self.detach_from_foothold();
        }
        if let Some(contact) = former {
            self.start_knockback(&contact.segment);
        }
    }

    /// Queues an impulse for the next update.
    ///
    /// Repeated hits before the next update only extend the queued impulse
    /// in the direction of the new hit and never beyond the new hit's own
    /// value. Disables wings.
    pub fn set_impact_next(&mut self, vx: f64, vy: f64) {
        self.flags.wings = false;
        let queued = self.pending_impact.unwrap_or(DVec2::ZERO);
        self.pending_impact = Some(DVec2::new(
            accumulate_impact(queued.x, vx),
            accumulate_impact(queued.y, vy),
        ));
    }

    /// Adds the queued impulse to the velocity and clears it.
    ///
    /// A grounded entity gets knockback bounds from its foothold and is
    /// knocked off it if the resulting vertical speed is significant.
    pub fn apply_pending_impact(&mut self) {
        let Some(impulse) = self.pending_impact.take() else {
            return;
        };
        self.velocity += impulse;
        let Support::Grounded(contact) = self.support else {
            return;
        };
        self.start_knockback(&contact.segment);
        if self.velocity.y.abs() > IMPACT_DETACH_SPEED {
            self.fall_start = Some(contact.id);
            self.support = Support::Airborne;
            self.jump_state = JumpState::Falling;
            debug!("knocked off {}", contact.id);
        }
    }

    /// Ends any active knockback.
    pub const fn clear_knockback(&mut self) {
        self.knockback = None;
    }

    fn start_knockback(&mut self, segment: &Segment) {
        self.knockback = Some(Knockback::spanning(
            segment,
            self.constants.tunables().knockback_duration,
        ));
    }

    // ----- speed laws -----

    /// Applies the walk law to the horizontal velocity.
    ///
    /// Non-idle input turns the entity unless flipping is disabled.
    pub fn calc_walk(&mut self, input: AxisInput, params: &MotionParams, dt: f64) {
        self.velocity.x = walk_speed_step(self.velocity.x, input, params, dt);
        self.turn_toward(input);
    }

    /// Applies the walk law with the configured walk rates.
    pub fn walk(&mut self, input: AxisInput, dt: f64) {
        let rates = self.constants.walk_rates();
        self.velocity.x = speed_step(self.velocity.x, input, &rates, dt);
        self.turn_toward(input);
    }

    /// Sets the climbing velocity from vertical input while on a ladder.
    pub fn climb(&mut self, input: AxisInput) {
        if !self.is_on_ladder_or_rope() {
            return;
        }
        let speed = self.constants.climb_speed();
        self.velocity.y = match input {
            AxisInput::Negative => -speed,
            AxisInput::Idle => 0.0,
            AxisInput::Positive => speed,
        };
    }

    fn turn_toward(&mut self, input: AxisInput) {
        if self.no_flip {
            return;
        }
        match input {
            AxisInput::Negative => self.facing = Direction::Left,
            AxisInput::Positive => self.facing = Direction::Right,
            AxisInput::Idle => {}
        }
    }

    // ----- move path -----

    /// Snapshot of the current state as a move path element.
    #[must_use]
    pub fn make_new_move_path_elem(&self, now_ms: u64) -> MovePathElement {
        MovePathElement {
            x: truncate_to_i32(self.position.x),
            y: truncate_to_i32(self.position.y),
            vx: truncate_to_i16(self.velocity.x),
            vy: truncate_to_i16(self.velocity.y),
            action: self.action,
            foothold_id: self.foothold_id().map_or(0, |id| id.0),
            timestamp_ms: now_ms,
            facing_right: self.facing == Direction::Right,
            duration_ms: 0,
            stat_changed: false,
        }
    }

    /// A single-element path describing the current state.
    #[must_use]
    pub fn make_move_path(&self, now_ms: u64) -> Vec<MovePathElement> {
        vec![self.make_new_move_path_elem(now_ms)]
    }

    /// Starts recording the move path.
    pub fn start_path_recording(&mut self, now_ms: u64) {
        self.path.start(now_ms);
    }

    /// Stops recording and discards the buffered path.
    pub fn stop_path_recording(&mut self) {
        self.path.stop();
    }

    /// Whether the move path is being recorded.
    #[must_use]
    pub const fn is_recording_path(&self) -> bool {
        self.path.is_recording()
    }

    /// Whether a new sample is due at `now_ms`.
    #[must_use]
    pub const fn is_time_for_flush(&self, now_ms: u64) -> bool {
        self.path.is_time_for_flush(now_ms)
    }

    /// Records a sample if recording and due.
    pub fn make_continuous_move_path(&mut self, now_ms: u64) -> bool {
        let element = self.make_new_move_path_elem(now_ms);
        self.path.record_if_due(now_ms, || element)
    }

    /// Flags the next recorded element as following a stat change.
    pub const fn mark_stat_changed(&mut self) {
        self.path.mark_stat_changed();
    }

    /// Returns and clears the recorded path.
    pub fn flush_move_path(&mut self) -> Vec<MovePathElement> {
        self.path.flush()
    }

    /// The recorder sampling this controller.
    #[must_use]
    pub const fn move_path(&self) -> &MovePathRecorder {
        &self.path
    }
}

fn accumulate_impact(queued: f64, incoming: f64) -> f64 {
    if incoming < 0.0 && incoming < queued {
        (incoming + queued).max(incoming)
    } else if incoming > 0.0 && incoming > queued {
        (incoming + queued).min(incoming)
    } else {
        queued
    }
}
