//! Code generation for compiled-in physics defaults.
//!
//! `physics.toml` groups keys into tables for readability. Generation
//! flattens one level of tables and emits a documented `pub const` per key.

use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use toml::Value;

/// Name of the defaults file expected at the crate root.
pub const PHYSICS_FILE: &str = "physics.toml";

/// Name of the generated file written into `OUT_DIR`.
pub const GENERATED_FILE: &str = "physics_defaults.rs";

/// Line templates used when rendering a constant.
pub struct Formats {
    pub int_fmt: &'static str,
    pub float_fmt: &'static str,
}

pub const RUST_FMTS: Formats = Formats {
    int_fmt: "pub const {}: i64 = {};\n",
    float_fmt: "pub const {}: f64 = {};\n",
};

/// Reads `physics.toml` from `manifest_dir` and writes the generated Rust
/// source into `out_dir`.
pub fn generate_constants(
    manifest_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let parsed = parse_constants(manifest_dir)?;
    fs::write(
        out_dir.as_ref().join(GENERATED_FILE),
        generate_code_from_constants(&parsed, &RUST_FMTS),
    )?;
    Ok(())
}

pub fn parse_constants(manifest_dir: impl AsRef<Path>) -> Result<Value, Box<dyn Error>> {
    let const_path = manifest_dir.as_ref().join(PHYSICS_FILE);
    let toml_str = fs::read_to_string(const_path)?;
    Ok(toml_str.parse()?)
}

fn for_each_constant<F>(parsed: &Value, mut f: F)
where
    F: FnMut(&str, &Value),
{
    if let Some(map) = parsed.as_table() {
        for (k, v) in map {
            if let Some(tab) = v.as_table() {
                for (subk, subv) in tab {
                    f(subk, subv);
                }
            } else {
                f(k, v);
            }
        }
    }
}

fn fill2(fmt: &str, a: impl std::fmt::Display, b: impl std::fmt::Display) -> String {
    fmt.replacen("{}", &a.to_string(), 1)
        .replacen("{}", &b.to_string(), 1)
}

/// Renders every numeric key of `parsed` as a documented constant.
///
/// Non-numeric values cannot describe a physics tunable and are reported as
/// cargo warnings instead of being emitted.
pub fn generate_code_from_constants(parsed: &Value, fmts: &Formats) -> String {
    let mut code = String::from("// @generated - do not edit\n");
    for_each_constant(parsed, |k, v| {
        let name = k.to_uppercase();
        let line = match v {
            Value::Integer(i) => fill2(fmts.int_fmt, &name, i),
            Value::Float(f) => fill2(fmts.float_fmt, &name, format!("{f:?}")),
            other => {
                println!(
                    "cargo:warning=Unsupported constant `{}` of type {}",
                    name,
                    other.type_str()
                );
                return;
            }
        };
        let _ = writeln!(code, "/// Default `{k}` from `{PHYSICS_FILE}`.");
        code.push_str(&line);
    });
    code
}
