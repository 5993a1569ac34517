#![cfg_attr(docsrs, feature(doc_cfg))]
//! Foothold-based 2D movement and physics core.
//!
//! The crate advances per-entity motion controllers over piecewise-linear
//! foothold geometry: ground walking along slopes, ladder and rope
//! climbing, jump and fall arcs under gravity, swimming and flying, and
//! knockback. Physics constants are loaded once and shared read-only.
pub mod config;
pub mod constants;
pub mod foothold;
pub mod logging;
pub mod motion;
pub mod move_path;
pub mod numeric;
pub mod physics;

pub use config::{DataUnavailable, FloatParams, PhysicsConstants, Tunables};
pub use foothold::{
    interpolate_y, Direction, FootholdId, FootholdLine, FootholdMap, FootholdQuery, MapBounds,
    Segment,
};
pub use logging::init as init_logging;
pub use motion::{
    Contact, FloatMode, JumpState, LadderGrip, LadderKind, MotionController, MoveAction, Support,
};
pub use move_path::{MovePathElement, MovePathRecorder};
pub use physics::{
    acc_speed, applied_acceleration, dec_speed, AxisInput, MotionParams, SpeedRates,
};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use ledge::prelude::*;
    //! ```

    pub use crate::AxisInput;
    pub use crate::FootholdLine;
    pub use crate::FootholdMap;
    pub use crate::FootholdQuery;
    pub use crate::MotionController;
    pub use crate::PhysicsConstants;
    pub use glam::DVec2;
}
