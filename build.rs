// RustEegSampler - Build Script

use std::env;
use std::process::Command;

fn main() {
    // ESP-IDF environment setup, only when cross-building for the MCU
    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Get git version info
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!(
        "cargo:rustc-env=VERSION_STRING=RustEegSampler v{}-g{}",
        version, git_hash
    );

    // Rebuild if git HEAD changes
    println!("cargo:rerun-if-changed=.git/HEAD");
}
