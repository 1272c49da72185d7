//! Selects the credentials file compiled into the crate.
//!
//! `credentials.rs` at the crate root wins when present. Otherwise the
//! checked-in `credentials.example.rs` template is used so the library and
//! its tests still build.

use std::env;
use std::fs;
use std::path::PathBuf;

const LOCAL_FILE: &str = "credentials.rs";
const TEMPLATE_FILE: &str = "credentials.example.rs";
const OVERRIDE_VARS: [&str; 3] = ["WIFI_SSID", "WIFI_PASSWORD", "SERVER_HOST"];

fn main() {
    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set"));

    println!("cargo::rustc-check-cfg=cfg(credentials_template)");
    println!("cargo::rerun-if-changed={LOCAL_FILE}");
    println!("cargo::rerun-if-changed={TEMPLATE_FILE}");
    for var in OVERRIDE_VARS {
        println!("cargo::rerun-if-env-changed={var}");
    }

    let local = manifest_dir.join(LOCAL_FILE);
    let source = if local.is_file() {
        local
    } else {
        println!(
            "cargo::warning={LOCAL_FILE} not found, building with placeholder values from {TEMPLATE_FILE}"
        );
        println!("cargo::rustc-cfg=credentials_template");
        manifest_dir.join(TEMPLATE_FILE)
    };

    fs::copy(&source, out_dir.join("credentials.rs"))
        .unwrap_or_else(|e| panic!("failed to copy {}: {e}", source.display()));
}
