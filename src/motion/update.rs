//! Per-tick integration for each support regime.

use log::warn;

use super::{Contact, JumpState, LadderGrip, MotionController, MoveAction, Support};
use crate::constants::MOVING_SPEED_THRESHOLD;
use crate::physics::dec_speed_by;

impl MotionController {
    /// Advances the controller by `dt` seconds.
    ///
    /// Applies any queued impact, then integrates according to the current
    /// support and recomputes the action and jump labels. Geometry is not
    /// consulted; see [`MotionController::step`] for edge transitions and
    /// landing.
    pub fn update(&mut self, dt: f64) {
        if !dt.is_finite() || dt < 0.0 {
            warn!("ignoring invalid time step {dt}");
            return;
        }
        self.apply_pending_impact();
        match self.support {
            Support::Ladder(grip) => self.update_ladder(&grip, dt),
            Support::Grounded(contact) => self.update_ground(&contact, dt),
            Support::Airborne => self.update_air(dt),
        }
    }

    fn update_ladder(&mut self, grip: &LadderGrip, dt: f64) {
        self.position.x = grip.x;
        self.position.y += self.velocity.y * dt;
        if self.position.y < grip.top {
            self.position.y = grip.top;
            self.velocity.y = 0.0;
        } else if self.position.y > grip.bottom {
            self.position.y = grip.bottom;
            self.velocity.y = 0.0;
        }
        self.action = if self.velocity.y.abs() > MOVING_SPEED_THRESHOLD {
            grip.kind.action()
        } else {
            MoveAction::Stand
        };
        self.jump_state = JumpState::None;
    }

    fn update_ground(&mut self, contact: &Contact, dt: f64) {
        self.position.x += self.velocity.x * dt;
        self.clamp_to_knockback(dt);
        self.position.y = contact.segment.interpolate_y(self.position.x);
        self.action = if self.velocity.x.abs() > MOVING_SPEED_THRESHOLD {
            MoveAction::Walk
        } else {
            MoveAction::Stand
        };
        self.jump_state = JumpState::None;
    }

    fn update_air(&mut self, dt: f64) {
        let mode = self.float_mode();
        if mode.is_floating() {
            self.update_float(mode, dt);
            return;
        }

        let constants = &self.constants;
        let tunables = constants.tunables();
        let gravity = tunables.gravity_acc * constants.float_params(mode).gravity_factor();
        self.velocity.y = (self.velocity.y + gravity * dt).min(tunables.fall_speed);
        self.velocity.x =
            dec_speed_by(self.velocity.x, constants.air_drag_deceleration(), 0.0, dt);

        self.position += self.velocity * dt;
        self.clamp_to_knockback(dt);

        if self.velocity.y < 0.0 {
            self.jump_state = JumpState::Jumping;
            self.action = MoveAction::Jump;
        } else {
            self.jump_state = JumpState::Falling;
            self.action = MoveAction::Fall;
        }
    }

    fn clamp_to_knockback(&mut self, dt: f64) {
        let Some(knockback) = &mut self.knockback else {
            return;
        };
        if self.position.x < knockback.min_x {
            self.position.x = knockback.min_x;
            self.velocity.x = 0.0;
        } else if self.position.x > knockback.max_x {
            self.position.x = knockback.max_x;
            self.velocity.x = 0.0;
        }
        knockback.remaining -= dt;
        if knockback.remaining <= 0.0 {
            self.knockback = None;
        }
    }
}
