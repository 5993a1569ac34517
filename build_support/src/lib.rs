//! Build support utilities used by the project's build script.
//! Bakes the physics defaults from `physics.toml` into generated Rust.

pub mod constants;

use color_eyre::eyre::{eyre, Result};
use std::path::PathBuf;

/// Execute all build steps required by `build.rs`.
/// This generates `physics_defaults.rs` in `OUT_DIR`.
/// Environment variables such as `CARGO_MANIFEST_DIR` must be set
/// by Cargo before this function is called.
///
/// # Examples
/// ```rust,no_run
/// use color_eyre::eyre::Result;
/// fn main() -> Result<()> {
///     build_support::build()
/// }
/// ```
///
/// # Errors
/// Returns an error if required environment variables are missing, if
/// `physics.toml` cannot be read or parsed, or if the output cannot be
/// written.
pub fn build() -> Result<()> {
    set_rerun_triggers();

    let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
    let out_dir = env_path("OUT_DIR")?;

    constants::generate_constants(&manifest_dir, &out_dir).map_err(|e| eyre!("{e}"))?;

    Ok(())
}

fn env_path(key: &str) -> Result<PathBuf> {
    Ok(PathBuf::from(std::env::var(key)?))
}

fn set_rerun_triggers() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", constants::PHYSICS_FILE);
}
