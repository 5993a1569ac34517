//! Physics constants used across the motion core.
//!
//! The tunable defaults are generated from `physics.toml` at build time and
//! re-exported here. The remaining constants are fixed thresholds of the
//! movement model that the data source does not carry.

mod defaults {
    include!(concat!(env!("OUT_DIR"), "/physics_defaults.rs"));
}

pub use defaults::*;

/// Speed (px/s) above which a grounded or climbing entity counts as moving
/// for action labels.
pub const MOVING_SPEED_THRESHOLD: f64 = 5.0;

/// Downward speed (px/s) given to an entity that drops through its platform.
pub const JUMP_DOWN_SPEED: f64 = 50.0;

/// Vertical speed (px/s) above which a queued impact knocks a grounded
/// entity off its foothold.
pub const IMPACT_DETACH_SPEED: f64 = 0.1;

/// Climbing speed as a fraction of the walk speed.
pub const CLIMB_SPEED_FACTOR: f64 = 0.6;

/// Gravity multiplier applied while the wings modifier is active.
pub const WINGS_GRAVITY_FACTOR: f64 = 0.3;

/// Gravity multiplier for the swim sink law.
pub const SWIM_GRAVITY_FACTOR: f64 = 0.3;

/// Fraction of the vertical float acceleration an idle floater sinks by,
/// whatever its float mode.
pub const FLOAT_SINK_FACTOR: f64 = 0.3;

/// Swim upward speed cap as a fraction of the float max speed.
pub const FLOAT_UP_SPEED_FACTOR: f64 = 0.3;

/// Swim downward speed cap as a fraction of the float max speed.
pub const FLOAT_DOWN_SPEED_FACTOR: f64 = 1.5;

/// Vertical float acceleration per second as a multiple of max speed.
pub const FLOAT_VERTICAL_ACCEL_FACTOR: f64 = 3.0;

/// Fraction of vertical float speed shed per second without input.
pub const FLOAT_VERTICAL_DRAG: f64 = 2.0;

/// Horizontal span below which a foothold is treated as vertical.
pub const DEGENERATE_SPAN: f64 = 0.001;

/// Minimum downward search range (px) when looking for a landing foothold.
pub const MIN_LANDING_SEARCH: f64 = 20.0;

/// Landing search range added per px/s of fall speed.
pub const LANDING_SEARCH_PER_SPEED: f64 = 0.05;

/// Minimum upward tolerance (px) when looking for a landing foothold.
pub const LANDING_UPWARD_TOLERANCE: f64 = 10.0;

/// Search range (px) for a foothold at the same level past a platform edge.
pub const SAME_LEVEL_SEARCH: f64 = 30.0;

/// Upward tolerance (px) for a foothold at the same level past an edge.
pub const SAME_LEVEL_TOLERANCE: f64 = 5.0;

/// Depth (px) searched below a platform edge before allowing a walk-off.
pub const FALL_OFF_SEARCH: f64 = 500.0;

/// Default interval (ms) between recorded move path elements.
pub const PATH_FLUSH_INTERVAL_MS: u64 = 100;

/// Default maximum number of buffered move path elements.
pub const PATH_CAPACITY: usize = 50;
