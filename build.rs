//! Embeds a build number and timestamp for the startup banner and status tool.
//!
//! The number lives in `build_number.txt` at the crate root and goes up by one
//! whenever anything under `src/` changes.

use std::fs;
use std::path::Path;

fn next_build_number(counter: &Path) -> u64 {
    let previous = fs::read_to_string(counter)
        .ok()
        .and_then(|text| text.trim().parse::<u64>().ok())
        .unwrap_or(0);
    previous + 1
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let counter = Path::new("build_number.txt");
    let build = next_build_number(counter);
    if let Err(e) = fs::write(counter, build.to_string()) {
        println!("cargo:warning=could not record build number: {}", e);
    }

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=BAKECOST_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=BAKECOST_BUILD_TIMESTAMP={}", timestamp);
}
