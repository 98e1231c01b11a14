pub mod game;
pub mod gameroom;
#[cfg(feature = "server")]
pub mod hosting;

/// Initialize terminal logging for server binaries.
#[cfg(feature = "server")]
pub fn log() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("initialize logger");
}

/// Register Ctrl+C handler for immediate termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install signal handler");
        println!();
        log::warn!("interrupt received, exiting");
        std::process::exit(0);
    });
}
