fn main() {
    println!("cargo:rerun-if-env-changed=GSTREAMER_FRAMEWORK_DIR");

    if cfg!(target_os = "macos") {
        let frameworks = std::env::var("GSTREAMER_FRAMEWORK_DIR")
            .unwrap_or_else(|_| "/Library/Frameworks".to_string());

        println!("cargo:rustc-link-search=framework={frameworks}");
        println!(
            "cargo:rustc-link-arg=-Wl,-rpath,{frameworks}/GStreamer.framework/Versions/1.0/lib"
        );
    }
}
