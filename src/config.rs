//! Physics constants snapshot shared by every motion controller.
//!
//! A [`PhysicsConstants`] value is built once, either from the compiled-in
//! defaults or from a TOML source laid out like `physics.toml`, and is then
//! read concurrently by all controllers. Derived quantities are computed at
//! construction so the per-tick code never divides by mass again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use toml::{Table, Value};

use crate::constants::{
    CLIMB_SPEED_FACTOR, DEFAULT_MASS, FALL_SPEED, FLOAT_COEFFICIENT, FLOAT_DRAG1, FLOAT_DRAG2,
    FLY_FORCE, FLY_JUMP_DEC, FLY_SPEED, GRAVITY_ACC, JUMP_SPEED, KNOCKBACK_DURATION, MAX_FRICTION,
    MIN_FRICTION, SLIP_FORCE, SLIP_SPEED, SWIM_FORCE, SWIM_GRAVITY_FACTOR, SWIM_SPEED,
    SWIM_SPEED_DEC, WALK_DRAG, WALK_FORCE, WALK_SPEED, WINGS_GRAVITY_FACTOR,
};
use crate::motion::FloatMode;
use crate::physics::{MotionParams, SpeedRates};

/// Failure to obtain a usable set of physics constants.
///
/// The simulation is meaningless without valid constants, so callers should
/// either surface this error or fall back to [`PhysicsConstants::default`]
/// explicitly.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    /// The source file could not be read.
    #[error("physics constants source `{}` could not be read: {source}", .path.display())]
    Missing {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The source is not valid TOML.
    #[error("physics constants source is not valid TOML: {0}")]
    Malformed(#[from] toml::de::Error),
    /// A known key holds something other than a number.
    #[error("physics constant `{name}` must be a number")]
    WrongType {
        /// Offending key.
        name: String,
    },
    /// A value violates the constraints of the model.
    #[error("physics constant `{name}` must be {requirement}, got {value}")]
    OutOfRange {
        /// Offending key.
        name: &'static str,
        /// Human-readable constraint.
        requirement: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Raw tunables as stored in the data source.
///
/// Field names match the keys of `physics.toml`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
    /// Walking force.
    pub walk_force: f64,
    /// Maximum walking speed (px/s).
    pub walk_speed: f64,
    /// Walking drag.
    pub walk_drag: f64,
    /// Force pulling an entity down a slippery slope.
    pub slip_force: f64,
    /// Maximum slipping speed (px/s).
    pub slip_speed: f64,
    /// Float drag for flying and passive air drag.
    pub float_drag1: f64,
    /// Float drag while swimming.
    pub float_drag2: f64,
    /// Float coefficient carried from the data source.
    pub float_coefficient: f64,
    /// Swimming force.
    pub swim_force: f64,
    /// Maximum swimming speed (px/s).
    pub swim_speed: f64,
    /// Swim speed decrement.
    pub swim_speed_dec: f64,
    /// Flying force.
    pub fly_force: f64,
    /// Maximum flying speed (px/s).
    pub fly_speed: f64,
    /// Flying jump decrement.
    pub fly_jump_dec: f64,
    /// Gravity acceleration (px/s²).
    pub gravity_acc: f64,
    /// Terminal fall speed (px/s).
    pub fall_speed: f64,
    /// Initial upward jump speed (px/s).
    pub jump_speed: f64,
    /// Upper friction bound.
    pub max_friction: f64,
    /// Lower friction bound.
    pub min_friction: f64,
    /// Mass used when an entity does not specify its own.
    pub default_mass: f64,
    /// Seconds a knockback keeps the entity on its foothold span.
    pub knockback_duration: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            walk_force: WALK_FORCE,
            walk_speed: WALK_SPEED,
            walk_drag: WALK_DRAG,
            slip_force: SLIP_FORCE,
            slip_speed: SLIP_SPEED,
            float_drag1: FLOAT_DRAG1,
            float_drag2: FLOAT_DRAG2,
            float_coefficient: FLOAT_COEFFICIENT,
            swim_force: SWIM_FORCE,
            swim_speed: SWIM_SPEED,
            swim_speed_dec: SWIM_SPEED_DEC,
            fly_force: FLY_FORCE,
            fly_speed: FLY_SPEED,
            fly_jump_dec: FLY_JUMP_DEC,
            gravity_acc: GRAVITY_ACC,
            fall_speed: FALL_SPEED,
            jump_speed: JUMP_SPEED,
            max_friction: MAX_FRICTION,
            min_friction: MIN_FRICTION,
            default_mass: DEFAULT_MASS,
            knockback_duration: KNOCKBACK_DURATION,
        }
    }
}

impl Tunables {
    fn entries(&self) -> [(&'static str, f64); 21] {
        [
            ("walk_force", self.walk_force),
            ("walk_speed", self.walk_speed),
            ("walk_drag", self.walk_drag),
            ("slip_force", self.slip_force),
            ("slip_speed", self.slip_speed),
            ("float_drag1", self.float_drag1),
            ("float_drag2", self.float_drag2),
            ("float_coefficient", self.float_coefficient),
            ("swim_force", self.swim_force),
            ("swim_speed", self.swim_speed),
            ("swim_speed_dec", self.swim_speed_dec),
            ("fly_force", self.fly_force),
            ("fly_speed", self.fly_speed),
            ("fly_jump_dec", self.fly_jump_dec),
            ("gravity_acc", self.gravity_acc),
            ("fall_speed", self.fall_speed),
            ("jump_speed", self.jump_speed),
            ("max_friction", self.max_friction),
            ("min_friction", self.min_friction),
            ("default_mass", self.default_mass),
            ("knockback_duration", self.knockback_duration),
        ]
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        let field = match name {
            "walk_force" => &mut self.walk_force,
            "walk_speed" => &mut self.walk_speed,
            "walk_drag" => &mut self.walk_drag,
            "slip_force" => &mut self.slip_force,
            "slip_speed" => &mut self.slip_speed,
            "float_drag1" => &mut self.float_drag1,
            "float_drag2" => &mut self.float_drag2,
            "float_coefficient" => &mut self.float_coefficient,
            "swim_force" => &mut self.swim_force,
            "swim_speed" => &mut self.swim_speed,
            "swim_speed_dec" => &mut self.swim_speed_dec,
            "fly_force" => &mut self.fly_force,
            "fly_speed" => &mut self.fly_speed,
            "fly_jump_dec" => &mut self.fly_jump_dec,
            "gravity_acc" => &mut self.gravity_acc,
            "fall_speed" => &mut self.fall_speed,
            "jump_speed" => &mut self.jump_speed,
            "max_friction" => &mut self.max_friction,
            "min_friction" => &mut self.min_friction,
            "default_mass" => &mut self.default_mass,
            "knockback_duration" => &mut self.knockback_duration,
            _ => return None,
        };
        Some(field)
    }

    fn validate(&self) -> Result<(), DataUnavailable> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(DataUnavailable::OutOfRange {
                    name,
                    requirement: "finite and non-negative",
                    value,
                });
            }
        }
        if self.default_mass <= 0.0 {
            return Err(DataUnavailable::OutOfRange {
                name: "default_mass",
                requirement: "positive",
                value: self.default_mass,
            });
        }
        Ok(())
    }
}

/// Parameters of one float regime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatParams {
    motion: MotionParams,
    rates: SpeedRates,
    gravity_factor: f64,
}

impl FloatParams {
    /// Builds a regime, resolving its horizontal rates against the mass.
    #[must_use]
    pub fn new(motion: MotionParams, gravity_factor: f64) -> Self {
        Self {
            rates: motion.rates(),
            motion,
            gravity_factor,
        }
    }

    /// Horizontal law parameters.
    #[must_use]
    pub const fn motion(&self) -> &MotionParams {
        &self.motion
    }

    /// Horizontal law with force and drag divided by mass.
    #[must_use]
    pub const fn rates(&self) -> &SpeedRates {
        &self.rates
    }

    /// Gravity multiplier while airborne in this regime.
    #[must_use]
    pub const fn gravity_factor(&self) -> f64 {
        self.gravity_factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatTable {
    normal: FloatParams,
    swimming: FloatParams,
    flying: FloatParams,
    wings: FloatParams,
}

impl FloatTable {
    fn new(t: &Tunables) -> Self {
        let params = |max_speed, force, drag, gravity_factor| {
            let motion = MotionParams {
                max_speed,
                force,
                drag,
                mass: t.default_mass,
            };
            FloatParams::new(motion, gravity_factor)
        };
        Self {
            normal: params(t.walk_speed, t.walk_force, t.float_drag1, 1.0),
            swimming: params(
                t.swim_speed,
                t.swim_force,
                t.float_drag2,
                SWIM_GRAVITY_FACTOR,
            ),
            flying: params(t.fly_speed, t.fly_force, t.float_drag1, 0.0),
            wings: params(
                t.walk_speed,
                t.walk_force,
                t.float_drag1,
                WINGS_GRAVITY_FACTOR,
            ),
        }
    }
}

/// Immutable physics configuration injected into motion controllers.
///
/// # Examples
/// ```
/// use ledge::PhysicsConstants;
/// let constants = PhysicsConstants::from_toml_str("[fall]\njump_speed = 600\n").unwrap();
/// assert_eq!(constants.tunables().jump_speed, 600.0);
/// assert_eq!(constants.tunables().gravity_acc, PhysicsConstants::default().tunables().gravity_acc);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConstants {
    tunables: Tunables,
    walk_acceleration: f64,
    walk_deceleration: f64,
    air_drag_deceleration: f64,
    climb_speed: f64,
    float_table: FloatTable,
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self::derive(Tunables::default())
    }
}

impl PhysicsConstants {
    /// Validates `tunables` and computes the derived values.
    ///
    /// # Errors
    /// Returns [`DataUnavailable::OutOfRange`] if any value is negative or
    /// non-finite, or if the mass is not positive.
    pub fn new(tunables: Tunables) -> Result<Self, DataUnavailable> {
        tunables.validate()?;
        Ok(Self::derive(tunables))
    }

    fn derive(tunables: Tunables) -> Self {
        let mass = tunables.default_mass;
        Self {
            walk_acceleration: tunables.walk_force / mass,
            walk_deceleration: tunables.walk_drag / mass,
            air_drag_deceleration: tunables.float_drag1 / mass,
            climb_speed: tunables.walk_speed * CLIMB_SPEED_FACTOR,
            float_table: FloatTable::new(&tunables),
            tunables,
        }
    }

    /// Reads and parses a TOML source from `path`.
    ///
    /// # Errors
    /// Returns [`DataUnavailable::Missing`] if the file cannot be read, and
    /// the errors of [`Self::from_toml_str`] otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataUnavailable> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| DataUnavailable::Missing {
            path: path.to_path_buf(),
            source,
        })?;
        let constants = Self::from_toml_str(&source)?;
        info!(
            "physics constants loaded from {}: gravity={} jump={} fall={}",
            path.display(),
            constants.tunables.gravity_acc,
            constants.tunables.jump_speed,
            constants.tunables.fall_speed
        );
        Ok(constants)
    }

    /// Parses a TOML source laid out like `physics.toml`.
    ///
    /// Tables are flattened one level. Keys absent from the source keep
    /// their compiled-in default; unknown keys are logged and ignored.
    ///
    /// # Errors
    /// Returns [`DataUnavailable::Malformed`] for invalid TOML,
    /// [`DataUnavailable::WrongType`] for non-numeric values of known keys,
    /// and [`DataUnavailable::OutOfRange`] for values the model rejects.
    pub fn from_toml_str(source: &str) -> Result<Self, DataUnavailable> {
        let table: Table = toml::from_str(source)?;
        let mut tunables = Tunables::default();
        for (key, value) in flatten(&table) {
            let Some(field) = tunables.field_mut(key) else {
                warn!("unknown physics constant `{key}` ignored");
                continue;
            };
            *field = number(key, value)?;
        }
        debug!("physics tunables parsed: {tunables:?}");
        Self::new(tunables)
    }

    /// Raw tunables this snapshot was built from.
    #[must_use]
    pub const fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    /// Walk acceleration (walk force / mass) in px/s².
    #[must_use]
    pub const fn walk_acceleration(&self) -> f64 {
        self.walk_acceleration
    }

    /// Walk deceleration (walk drag / mass) in px/s².
    #[must_use]
    pub const fn walk_deceleration(&self) -> f64 {
        self.walk_deceleration
    }

    /// Passive horizontal air drag deceleration in px/s².
    #[must_use]
    pub const fn air_drag_deceleration(&self) -> f64 {
        self.air_drag_deceleration
    }

    /// Ladder and rope climbing speed in px/s.
    #[must_use]
    pub const fn climb_speed(&self) -> f64 {
        self.climb_speed
    }

    /// Walk law with the derived walk acceleration and deceleration.
    #[must_use]
    pub const fn walk_rates(&self) -> SpeedRates {
        SpeedRates {
            max_speed: self.tunables.walk_speed,
            acceleration: self.walk_acceleration,
            deceleration: self.walk_deceleration,
        }
    }

    /// Walk law parameters with the default mass.
    #[must_use]
    pub const fn walk_params(&self) -> MotionParams {
        MotionParams {
            max_speed: self.tunables.walk_speed,
            force: self.tunables.walk_force,
            drag: self.tunables.walk_drag,
            mass: self.tunables.default_mass,
        }
    }

    /// Float law parameters for `mode`.
    #[must_use]
    pub const fn float_params(&self, mode: FloatMode) -> FloatParams {
        match mode {
            FloatMode::Normal => self.float_table.normal,
            FloatMode::Swimming => self.float_table.swimming,
            FloatMode::Flying => self.float_table.flying,
            FloatMode::Wings => self.float_table.wings,
        }
    }
}

fn flatten(table: &Table) -> Vec<(&str, &Value)> {
    let mut entries = Vec::new();
    for (key, value) in table {
        if let Value::Table(section) = value {
            entries.extend(section.iter().map(|(k, v)| (k.as_str(), v)));
        } else {
            entries.push((key.as_str(), value));
        }
    }
    entries
}

#[expect(
    clippy::cast_precision_loss,
    reason = "Integer tunables are small enough to be exact in f64."
)]
fn number(key: &str, value: &Value) -> Result<f64, DataUnavailable> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        _ => Err(DataUnavailable::WrongType {
            name: key.to_owned(),
        }),
    }
}
