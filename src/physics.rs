//! Speed laws shared by every locomotion regime.
//!
//! The functions here are pure: they take a velocity component and return
//! the next one, so they can be exercised directly in tests and reused by
//! the controller for walking, floating and passive drag alike.

use log::warn;

use crate::constants::{
    FLOAT_DOWN_SPEED_FACTOR, FLOAT_SINK_FACTOR, FLOAT_UP_SPEED_FACTOR,
    FLOAT_VERTICAL_ACCEL_FACTOR, FLOAT_VERTICAL_DRAG,
};

/// Smallest acceptable mass to avoid numerically unstable accelerations.
const MIN_MASS: f64 = 1e-12;

/// Directional input along one axis.
///
/// Horizontally `Negative` is left; vertically it is up, matching the
/// screen-space convention where Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisInput {
    /// Towards negative coordinates.
    Negative,
    /// No input.
    #[default]
    Idle,
    /// Towards positive coordinates.
    Positive,
}

impl AxisInput {
    /// Builds an input from the sign of `value`.
    ///
    /// # Examples
    /// ```
    /// use ledge::physics::AxisInput;
    /// assert_eq!(AxisInput::from_sign(-3), AxisInput::Negative);
    /// assert_eq!(AxisInput::from_sign(0), AxisInput::Idle);
    /// ```
    #[must_use]
    pub const fn from_sign(value: i32) -> Self {
        if value < 0 {
            Self::Negative
        } else if value > 0 {
            Self::Positive
        } else {
            Self::Idle
        }
    }
}

impl From<i32> for AxisInput {
    fn from(value: i32) -> Self {
        Self::from_sign(value)
    }
}

/// Computes the acceleration produced by `force` on `mass`.
///
/// Returns `None` if `mass` is non-positive or effectively zero (see
/// [`MIN_MASS`]).
///
/// # Examples
///
/// ```
/// use ledge::applied_acceleration;
/// let a = applied_acceleration(700.0, 7.0).unwrap();
/// assert!((a - 100.0).abs() < 1e-9);
/// assert!(applied_acceleration(1.0, 0.0).is_none());
/// ```
#[must_use]
pub fn applied_acceleration(force: f64, mass: f64) -> Option<f64> {
    (mass > MIN_MASS).then(|| force / mass)
}

fn rate(force: f64, mass: f64) -> f64 {
    applied_acceleration(force, mass).unwrap_or_else(|| {
        warn!("non-positive mass {mass} ignored; speed left unchanged");
        0.0
    })
}

/// Accelerates `v` by `force / mass` over `dt`, capped at `±v_max`.
///
/// The sign of `force` selects the direction. A negative `v_max` disables
/// the law entirely and returns `v` unchanged, as does a velocity already
/// at or beyond the cap in the pushing direction.
///
/// # Examples
/// ```
/// use ledge::acc_speed;
/// assert_eq!(acc_speed(190.0, 1000.0, 100.0, 200.0, 1.0), 200.0);
/// assert_eq!(acc_speed(-190.0, -1000.0, 100.0, 200.0, 1.0), -200.0);
/// ```
#[must_use]
pub fn acc_speed(v: f64, force: f64, mass: f64, v_max: f64, dt: f64) -> f64 {
    acc_speed_by(v, rate(force, mass), v_max, dt)
}

/// [`acc_speed`] with the acceleration already resolved against the mass.
#[must_use]
pub fn acc_speed_by(v: f64, acceleration: f64, v_max: f64, dt: f64) -> f64 {
    if v_max < 0.0 {
        return v;
    }
    if acceleration > 0.0 && v_max > v {
        (v + acceleration * dt).min(v_max)
    } else if acceleration <= 0.0 && -v_max < v {
        (v + acceleration * dt).max(-v_max)
    } else {
        v
    }
}

/// Decelerates `v` by `drag / mass` over `dt` towards `±v_target`.
///
/// Speeds already within `[-v_target, v_target]` are left alone and the
/// result never crosses the target. A negative `v_target` disables the law.
///
/// # Examples
/// ```
/// use ledge::dec_speed;
/// assert_eq!(dec_speed(5.0, 1000.0, 100.0, 0.0, 1.0), 0.0);
/// assert_eq!(dec_speed(-5.0, 1000.0, 100.0, 0.0, 1.0), 0.0);
/// ```
#[must_use]
pub fn dec_speed(v: f64, drag: f64, mass: f64, v_target: f64, dt: f64) -> f64 {
    dec_speed_by(v, rate(drag, mass), v_target, dt)
}

/// [`dec_speed`] with the deceleration already resolved against the mass.
///
/// # Examples
/// ```
/// use ledge::physics::dec_speed_by;
/// assert_eq!(dec_speed_by(100.0, 3000.0, 0.0, 0.01), 70.0);
/// assert_eq!(dec_speed_by(-10.0, 3000.0, 0.0, 0.01), 0.0);
/// ```
#[must_use]
pub fn dec_speed_by(v: f64, deceleration: f64, v_target: f64, dt: f64) -> f64 {
    if v_target < 0.0 {
        return v;
    }
    if v_target < v {
        (v - deceleration * dt).max(v_target)
    } else if -v_target > v {
        (v + deceleration * dt).min(-v_target)
    } else {
        v
    }
}

/// Force, drag and caps for one locomotion law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Speed cap in px/s.
    pub max_speed: f64,
    /// Accelerating force.
    pub force: f64,
    /// Decelerating drag.
    pub drag: f64,
    /// Mass the force and drag act on.
    pub mass: f64,
}

impl MotionParams {
    /// Resolves force and drag against the mass.
    ///
    /// A non-positive mass yields zero rates, leaving speeds unchanged.
    #[must_use]
    pub fn rates(&self) -> SpeedRates {
        SpeedRates {
            max_speed: self.max_speed,
            acceleration: rate(self.force, self.mass),
            deceleration: rate(self.drag, self.mass),
        }
    }
}

/// A locomotion law with force and drag already divided by mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRates {
    /// Speed cap in px/s.
    pub max_speed: f64,
    /// Acceleration under input in px/s².
    pub acceleration: f64,
    /// Deceleration towards rest in px/s².
    pub deceleration: f64,
}

/// Advances a horizontal speed under directional input.
///
/// Idle input decelerates to rest. Input along the current motion (or from
/// rest) accelerates towards the cap. Input against the current motion
/// first decelerates to zero and, only if zero was reached within this same
/// call, accelerates in the new direction.
///
/// # Examples
/// ```
/// use ledge::physics::{walk_speed_step, AxisInput, MotionParams};
/// let params = MotionParams { max_speed: 100.0, force: 1e6, drag: 1e6, mass: 100.0 };
/// let v = walk_speed_step(100.0, AxisInput::Negative, &params, 1.0);
/// assert_eq!(v, -100.0);
/// ```
#[must_use]
pub fn walk_speed_step(v: f64, input: AxisInput, params: &MotionParams, dt: f64) -> f64 {
    speed_step(v, input, &params.rates(), dt)
}

/// [`walk_speed_step`] over pre-resolved rates.
#[must_use]
pub fn speed_step(v: f64, input: AxisInput, rates: &SpeedRates, dt: f64) -> f64 {
    let SpeedRates {
        max_speed,
        acceleration,
        deceleration,
    } = *rates;
    match input {
        AxisInput::Idle => dec_speed_by(v, deceleration, 0.0, dt),
        AxisInput::Positive if v >= 0.0 => acc_speed_by(v, acceleration, max_speed, dt),
        AxisInput::Positive => {
            let slowed = dec_speed_by(v, deceleration, 0.0, dt);
            if slowed >= 0.0 {
                acc_speed_by(slowed, acceleration, max_speed, dt)
            } else {
                slowed
            }
        }
        AxisInput::Negative if v <= 0.0 => acc_speed_by(v, -acceleration, max_speed, dt),
        AxisInput::Negative => {
            let slowed = dec_speed_by(v, deceleration, 0.0, dt);
            if slowed <= 0.0 {
                acc_speed_by(slowed, -acceleration, max_speed, dt)
            } else {
                slowed
            }
        }
    }
}

/// Advances a vertical float speed.
///
/// This law is not the walk law rotated: it accelerates by a fixed multiple
/// of `max_speed` and caps upward motion at 30% and downward motion at 150%
/// of `max_speed`. Without input it sinks by a fixed fraction of that
/// acceleration in every float mode while shedding speed proportionally,
/// capped at the upward fraction.
#[must_use]
pub fn float_vertical_step(vy: f64, input: AxisInput, max_speed: f64, dt: f64) -> f64 {
    let accel = max_speed * FLOAT_VERTICAL_ACCEL_FACTOR * dt;
    match input {
        AxisInput::Idle => {
            let sunk = (vy + accel * FLOAT_SINK_FACTOR) * (1.0 - dt * FLOAT_VERTICAL_DRAG);
            sunk.min(max_speed * FLOAT_UP_SPEED_FACTOR)
        }
        AxisInput::Positive => (vy + accel).min(max_speed * FLOAT_DOWN_SPEED_FACTOR),
        AxisInput::Negative => (vy - accel).max(-max_speed * FLOAT_UP_SPEED_FACTOR),
    }
}
