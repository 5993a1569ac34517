//! Ground contact against live foothold geometry: edge transitions and
//! landing.

use log::debug;

use super::{Contact, JumpState, MotionController, MoveAction, Support};
use crate::constants::{
    FALL_OFF_SEARCH, LANDING_SEARCH_PER_SPEED, LANDING_UPWARD_TOLERANCE, MIN_LANDING_SEARCH,
    SAME_LEVEL_SEARCH, SAME_LEVEL_TOLERANCE,
};
use crate::foothold::{Direction, FootholdLine, FootholdQuery};

impl MotionController {
    /// Advances by `dt` seconds against `map`.
    ///
    /// Refreshes the cached foothold (detaching if it no longer exists),
    /// runs [`MotionController::update`], then either follows the ground
    /// past a foothold edge or lands a falling entity.
    pub fn step(&mut self, dt: f64, map: &impl FootholdQuery) {
        self.refresh_contact(map);
        self.update(dt);
        match self.support {
            Support::Grounded(contact) => self.follow_ground(contact, map),
            Support::Airborne if self.should_check_landing() => self.try_land(dt, map),
            Support::Airborne | Support::Ladder(_) => {}
        }
    }

    /// Drops through the current foothold unless it forbids falling down.
    pub fn jump_down_on(&mut self, map: &impl FootholdQuery) -> bool {
        let Some(id) = self.foothold_id() else {
            return false;
        };
        if map.foothold(id).is_some_and(|line| line.forbid_fall_down) {
            debug!("{id} forbids falling down");
            return false;
        }
        self.jump_down()
    }

    fn refresh_contact(&mut self, map: &impl FootholdQuery) {
        let Support::Grounded(contact) = &mut self.support else {
            return;
        };
        match map.foothold(contact.id) {
            Some(line) if !line.is_wall() => contact.segment = line.segment,
            _ => {
                debug!("{} is gone; falling", contact.id);
                self.detach_from_foothold();
            }
        }
    }

    fn follow_ground(&mut self, contact: Contact, map: &impl FootholdQuery) {
        let segment = contact.segment;
        let x = self.position.x;
        if segment.spans_x(x) {
            return;
        }
        let direction = if x > segment.max_x() {
            Direction::Right
        } else {
            Direction::Left
        };
        let edge = segment.end_toward(direction);

        if let Some(next) = map.neighbor_toward(contact.id, direction) {
            if next.is_wall() {
                debug!("{} blocks at x={}", next.id, edge.x);
                self.stop_at_edge(edge.x, edge.y);
            } else {
                self.move_onto(&next);
            }
            return;
        }

        let exclude = Some(contact.id);
        if let Some(line) =
            map.support_below(x, edge.y, SAME_LEVEL_SEARCH, SAME_LEVEL_TOLERANCE, exclude)
        {
            self.move_onto(&line);
        } else if map
            .support_below(x, edge.y, FALL_OFF_SEARCH, 0.0, exclude)
            .is_some()
        {
            debug!("walked off {} at x={x}", contact.id);
            self.detach_from_foothold();
        } else {
            self.stop_at_edge(edge.x, edge.y);
        }
    }

    fn move_onto(&mut self, line: &FootholdLine) {
        debug!("moved onto {}", line.id);
        self.support = Support::Grounded(Contact {
            id: line.id,
            segment: line.segment,
        });
        self.position.y = line.interpolate_y(self.position.x);
    }

    fn stop_at_edge(&mut self, x: f64, y: f64) {
        self.position.x = x;
        self.position.y = y;
        self.velocity.x = 0.0;
        if self.action == MoveAction::Walk {
            self.action = MoveAction::Stand;
        }
    }

    fn should_check_landing(&self) -> bool {
        self.velocity.y > 0.0 && !self.is_user_flying()
    }

    fn try_land(&mut self, dt: f64, map: &impl FootholdQuery) {
        let vy = self.velocity.y;
        let search_range = MIN_LANDING_SEARCH.max(vy * LANDING_SEARCH_PER_SPEED);
        let upward_tolerance = LANDING_UPWARD_TOLERANCE.max(vy * dt);
        let exclude = if self.jumping_down {
            self.fall_start
        } else {
            None
        };
        let (x, y) = (self.position.x, self.position.y);
        let Some(line) = map.support_below(x, y, search_range, upward_tolerance, exclude) else {
            return;
        };
        if Some(line.id) == self.fall_start && y < line.interpolate_y(x) {
            return;
        }
        self.land_on_foothold(&line);
        self.action = MoveAction::Stand;
        self.jump_state = JumpState::None;
    }
}
