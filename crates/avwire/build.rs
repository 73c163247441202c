// Bakes build provenance into the binary for `avwire version --extended`.
fn main() {
    for (source, exported) in [
        ("TARGET", "AVWIRE_BUILD_TARGET"),
        ("PROFILE", "AVWIRE_BUILD_PROFILE"),
    ] {
        println!("cargo:rerun-if-env-changed={source}");
        if let Ok(value) = std::env::var(source) {
            println!("cargo:rustc-env={exported}={value}");
        }
    }
}
