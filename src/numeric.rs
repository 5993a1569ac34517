//! Numeric conversion helpers used across the project.
//!
//! Move path elements pack continuous state into the integer widths a sync
//! transport expects. These helpers truncate towards zero the way a C-style
//! cast does, saturate at the target bounds, and map non-finite input to
//! zero, with debug assertions flagging values that should never occur.

/// Truncate a finite `f64` into `i32`, saturating at the `i32` bounds.
///
/// # Examples
/// ```
/// use ledge::numeric::truncate_to_i32;
/// assert_eq!(truncate_to_i32(-12.9), -12);
/// assert_eq!(truncate_to_i32(1e12), i32::MAX);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped into the i32 domain before casting."
)]
#[must_use]
pub fn truncate_to_i32(value: f64) -> i32 {
    debug_assert!(!value.is_nan(), "expected a number for i32 conversion");
    if value.is_nan() {
        return 0;
    }
    value
        .trunc()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Truncate a finite `f64` into `i16`, saturating at the `i16` bounds.
///
/// Velocities beyond the `i16` range are not expected from the movement
/// laws; the clamp only guards against corrupted state.
///
/// # Examples
/// ```
/// use ledge::numeric::truncate_to_i16;
/// assert_eq!(truncate_to_i16(555.7), 555);
/// assert_eq!(truncate_to_i16(-40_000.0), i16::MIN);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped into the i16 domain before casting."
)]
#[must_use]
pub fn truncate_to_i16(value: f64) -> i16 {
    debug_assert!(!value.is_nan(), "expected a number for i16 conversion");
    if value.is_nan() {
        return 0;
    }
    value
        .trunc()
        .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}
