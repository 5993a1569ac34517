//! Build script: runs the shared build-time checks from `build_support`.

use anyhow::anyhow;

fn main() -> anyhow::Result<()> {
    build_support::build().map_err(|e| anyhow!("{e:?}"))
}
