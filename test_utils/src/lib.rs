//! Utility helpers for tests.
//!
//! Fixture constructors for footholds, maps and controllers, plus the
//! assertion helpers used against generated code.

pub mod conversions;
pub mod physics;

pub use physics::{
    chain, controller_at, default_constants, flat, foothold, map_of, run_until, standing_on,
    Coords2D,
};

/// Assert that all strings in `keys` are present in `code`.
///
/// # Panics
/// Panics with a helpful message if any key is missing.
pub fn assert_all_present(code: &str, keys: &[&str]) {
    for key in keys {
        assert!(code.contains(key), "{key} not found in output");
    }
}

/// Assert that all strings in `keys` are absent from `code`.
///
/// # Panics
/// Panics with a helpful message if any key is found.
pub fn assert_all_absent(code: &str, keys: &[&str]) {
    for key in keys {
        assert!(!code.contains(key), "{key} should not be present");
    }
}

/// Checks that generated code parses as a Rust file of constants.
///
/// # Panics
/// Panics if `code` does not parse or contains no constants.
pub fn assert_valid_rust_syntax(code: &str) {
    if let Err(err) = syn::parse_file(code) {
        panic!("generated code does not parse: {err}\n{code}");
    }
    assert_all_present(code, &["pub const", ";"]);
    assert_all_absent(code, &["pub const ;"]);
}
