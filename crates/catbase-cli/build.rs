//! Bakes the deployment root into the launcher.
//!
//! Packaging sets `CATBASE_DEPLOY_ROOT`, which `src/main.rs` reads with
//! `option_env!`. Debug builds without it (local dev, tests) get the
//! fixture bundle under `tests/fixtures/deploy` instead; release builds
//! without it report a missing deployment root at run time.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo::rerun-if-env-changed=CATBASE_DEPLOY_ROOT");

    let packaged = env::var("CATBASE_DEPLOY_ROOT")
        .ok()
        .filter(|v| !v.is_empty());
    let root = packaged.or_else(|| {
        (env::var("PROFILE").as_deref() == Ok("debug")).then(|| {
            let fixture: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", "deploy"]
                .iter()
                .collect();
            fixture.display().to_string()
        })
    });

    if let Some(root) = root {
        println!("cargo::rustc-env=CATBASE_DEPLOY_ROOT={root}");
    }
}
