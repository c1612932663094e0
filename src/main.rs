//! Application entry point for live Chinese script conversion in the terminal.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime.
//! 4. Build the [`HttpConverter`] from config.
//! 5. Construct the [`ConversionScheduler`] with the last used variant.
//! 6. Spawn the renderer, which prints every published snapshot.
//! 7. Read commands from stdin until `:quit` or EOF.
//! 8. Persist the selected variant.

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::Context as _;
use hanconv_live::{
    app::{run_renderer, ConsoleApp, Flow},
    config::AppConfig,
    convert::{HttpConverter, LogSink},
    scheduler::ConversionScheduler,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("hanconv-live starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Conversion service
    let converter = Arc::new(HttpConverter::from_config(&config.service));
    log::info!("conversion service: {}", config.service.base_url);

    // 5. Scheduler (spawns onto the runtime from this thread)
    let scheduler = ConversionScheduler::with_handle(
        rt.handle().clone(),
        converter,
        Arc::new(LogSink),
        config.scheduler.clone(),
        &config.conversion.variant,
    );

    // 6. Renderer
    let changes = scheduler.subscribe();
    rt.spawn(async move {
        if let Err(e) = run_renderer(changes, io::stdout()).await {
            log::warn!("renderer stopped: cannot write to stdout ({e})");
        }
    });

    let app = ConsoleApp::new(scheduler);
    println!(
        "{}: type text to convert, :list for variants, :quit to leave",
        app.scheduler().selected_variant().title()
    );

    // 7. Input loop (blocking stdin on the main thread)
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match app.handle_line(&line) {
            Flow::Continue => {}
            Flow::Message(msg) => println!("{msg}"),
            Flow::Quit => break,
        }
    }

    // 8. Remember the selection for next time
    config.conversion.variant = app.scheduler().selected_variant().id.to_string();
    if let Err(e) = config.save() {
        log::warn!("Failed to save config: {e}");
    }

    drop(app);
    rt.shutdown_background();
    Ok(())
}
