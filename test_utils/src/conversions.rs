//! Conversion helpers for test coordinates.
//! Centralises `From` implementations enabling literal usage in tests.

use glam::DVec2;

use crate::physics::Coords2D;

macro_rules! impl_coords2_conversions {
    ($name:ident, $ty:ty) => {
        impl From<($ty, $ty)> for $name {
            fn from((x, y): ($ty, $ty)) -> Self {
                Self { x, y }
            }
        }
        impl From<$name> for ($ty, $ty) {
            fn from(coords: $name) -> Self {
                (coords.x, coords.y)
            }
        }
    };
}

impl_coords2_conversions!(Coords2D, f64);

impl From<Coords2D> for DVec2 {
    fn from(coords: Coords2D) -> Self {
        Self::new(coords.x, coords.y)
    }
}

impl From<DVec2> for Coords2D {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}
