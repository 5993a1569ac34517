//! Float physics shared by swimming, flying and wings.

use glam::DVec2;

use super::{FloatSnapshot, JumpState, MotionController, MoveAction};
use crate::config::FloatParams;
use crate::physics::{float_vertical_step, speed_step, AxisInput};

/// Locomotion law applied to an airborne entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatMode {
    /// Plain gravity.
    #[default]
    Normal,
    /// Inside a swim area.
    Swimming,
    /// Flying by mount, skill or map.
    Flying,
    /// Wings slow-fall modifier.
    Wings,
}

impl FloatMode {
    /// Whether the mode replaces gravity with float physics.
    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, Self::Swimming | Self::Flying)
    }
}

impl MotionController {
    /// Float mode resolved from the flags, highest priority first:
    /// flying, swimming, wings.
    #[must_use]
    pub const fn float_mode(&self) -> FloatMode {
        if self.is_user_flying() {
            FloatMode::Flying
        } else if self.flags.in_swim_area {
            FloatMode::Swimming
        } else if self.flags.wings {
            FloatMode::Wings
        } else {
            FloatMode::Normal
        }
    }

    /// Applies the float law to both velocity components.
    ///
    /// The horizontal axis follows the walk law with the mode's parameters;
    /// the vertical axis uses the separate float sub-law.
    pub fn calc_float(
        &mut self,
        input_x: AxisInput,
        input_y: AxisInput,
        params: &FloatParams,
        dt: f64,
    ) {
        self.velocity.x = speed_step(self.velocity.x, input_x, params.rates(), dt);
        self.velocity.y =
            float_vertical_step(self.velocity.y, input_y, params.motion().max_speed, dt);
    }

    pub(super) fn update_float(&mut self, mode: FloatMode, dt: f64) {
        let params = self.constants.float_params(mode);
        self.save_float_state_before_collision();
        self.calc_float(AxisInput::Idle, AxisInput::Idle, &params, dt);

        let target = self.position + self.velocity * dt;
        let resolved = self.collision_detect_float(target);
        let hit = resolved.cmpne(target);
        if hit.x {
            self.velocity.x = 0.0;
        }
        if hit.y {
            self.velocity.y = 0.0;
        }
        self.position = resolved;

        self.save_float_state_after_collision();
        self.bound_pos_map_range();

        self.action = match mode {
            FloatMode::Flying => MoveAction::Fly,
            FloatMode::Swimming => MoveAction::Swim,
            FloatMode::Normal | FloatMode::Wings if self.velocity.y < 0.0 => MoveAction::Jump,
            FloatMode::Normal | FloatMode::Wings => MoveAction::Fall,
        };
        self.jump_state = if self.velocity.y < 0.0 {
            JumpState::Jumping
        } else {
            JumpState::Falling
        };
    }

    /// Where a floating entity heading for `target` ends up.
    #[must_use]
    pub fn collision_detect_float(&self, target: DVec2) -> DVec2 {
        self.bounds.clamp(target)
    }

    /// Records position and velocity before float collision.
    pub const fn save_float_state_before_collision(&mut self) {
        self.float_snapshot = Some(FloatSnapshot {
            position: self.position,
            velocity: self.velocity,
        });
    }

    /// Updates the saved velocity with the post-collision value, keeping
    /// the saved position.
    pub const fn save_float_state_after_collision(&mut self) {
        if let Some(snapshot) = &mut self.float_snapshot {
            snapshot.velocity = self.velocity;
        }
    }

    /// Restores the saved float state. Returns `false` if none was saved.
    pub fn restore_float_state(&mut self) -> bool {
        let Some(snapshot) = self.float_snapshot.take() else {
            return false;
        };
        self.position = snapshot.position;
        self.velocity = snapshot.velocity;
        true
    }

    /// Clamps the position into the map bounds, zeroing velocity components
    /// that push outward.
    pub fn bound_pos_map_range(&mut self) {
        let bounds = self.bounds;
        if self.position.x < bounds.left {
            self.position.x = bounds.left;
            self.velocity.x = self.velocity.x.max(0.0);
        } else if self.position.x > bounds.right {
            self.position.x = bounds.right;
            self.velocity.x = self.velocity.x.min(0.0);
        }
        if self.position.y < bounds.top {
            self.position.y = bounds.top;
            self.velocity.y = self.velocity.y.max(0.0);
        } else if self.position.y > bounds.bottom {
            self.position.y = bounds.bottom;
            self.velocity.y = self.velocity.y.min(0.0);
        }
    }
}
