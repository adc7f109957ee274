use std::env;

fn main() {
    // Version shown by `--version` and in the startup banner
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    let version = match env::var("BUTTERFLY_BUILD_SUFFIX") {
        Ok(suffix) if !suffix.is_empty() => format!("{version}-{suffix}"),
        _ => version,
    };
    println!("cargo:rustc-env=BUTTERFLY_VERSION={}", version);

    println!("cargo:rerun-if-env-changed=BUTTERFLY_BUILD_SUFFIX");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
