fn main() {
    println!("cargo:rerun-if-env-changed=BARTIMER_CONFIG_JSON");

    // Host builds (tests, simulation) have no ESP-IDF sysroot to link against.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
