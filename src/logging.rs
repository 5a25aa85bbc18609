/// Installs the process-wide logger. Safe to call more than once.
///
/// On Android records go to logcat under the `jnimarshal` tag, elsewhere to
/// stderr through `env_logger`, filtered by `RUST_LOG`.
pub fn init() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("jnimarshal"),
    );

    #[cfg(not(target_os = "android"))]
    {
        let _ = env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .try_init();
    }
}
