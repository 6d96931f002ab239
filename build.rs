//! Purpose: Locate and link the native libssh engine.
//! Role: Cargo build-script; emits link directives and rebuild triggers.
//! Invariants: No C sources are compiled; the engine is linked, never vendored.
//! Invariants: Uses only Cargo-provided env vars plus the LIBSSH_* overrides.
use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=LIBSSH_LIB_DIR");
    println!("cargo:rerun-if-env-changed=LIBSSH_LINK_KIND");

    // An explicit prefix override wins over discovery.
    if let Ok(dir) = env::var("LIBSSH_LIB_DIR") {
        let kind = env::var("LIBSSH_LINK_KIND").unwrap_or_else(|_| "dylib".to_string());
        println!("cargo:rustc-link-search=native={dir}");
        println!("cargo:rustc-link-lib={kind}=ssh");
        return;
    }

    match pkg_config::Config::new().atleast_version("0.8.0").probe("libssh") {
        Ok(_) => {}
        Err(err) => {
            // Fall back to the conventional soname and let the linker search
            // the default paths.
            println!("cargo:warning=pkg-config could not find libssh ({err}); linking -lssh");
            println!("cargo:rustc-link-lib=dylib=ssh");
        }
    }
}
