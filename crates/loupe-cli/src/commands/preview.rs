//! Preview command.
//!
//! 1. Load configuration and resolve entries
//! 2. Build the style and script bundles
//! 3. Start the file watcher and both servers
//! 4. Rebuild and broadcast a reload on every change until Ctrl+C

use crate::cli::PreviewArgs;
use crate::config::PreviewConfig;
use crate::dev::{
    BundleBuilder, DevEvent, DevServerState, FileChange, FileWatcher, PreviewServer, SharedState,
    watcher::WatchFilter,
};
use crate::error::{CliError, Result};
use crate::startup::{HtmlSource, StartupConfig};
use crate::ui;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

pub async fn execute(args: PreviewArgs) -> Result<()> {
    let config = PreviewConfig::load(&args)?;
    let startup = StartupConfig::from_config(&config);

    ui::info(&format!("Previewing {}", config.dir.display()));
    match &startup.server.html {
        HtmlSource::Render(pipeline) => ui::info(&format!(
            "Rendering {} on every request",
            pipeline.component_path().display()
        )),
        HtmlSource::Static(markup) => ui::info(&format!("Serving {}", markup.display())),
        HtmlSource::None => ui::warning("No component or markup entry found, serving an empty page"),
    }

    let state = Arc::new(DevServerState::new(&startup));
    let builder = BundleBuilder::from_startup(&startup);

    // A broken bundle at startup shows the overlay, it does not abort.
    rebuild(&builder, &state, "Initial build").await;

    let filter = WatchFilter::new(
        startup.watch.root.clone(),
        &startup.watch.ignore,
        config.framework.clone(),
    );
    let (watcher, mut change_rx) = FileWatcher::new(filter, startup.watch.debounce_ms)?;
    ui::info(&format!("Watching for changes in {}", watcher.root().display()));

    let server = PreviewServer::new(
        state.clone(),
        startup.server.port,
        startup.server.live_reload_port,
    );
    let url = server.url();
    let mut server_handle = tokio::spawn(server.start());

    if config.open {
        open_browser(&url);
    }

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = change_rx.recv() => {
                handle_file_change(change, &builder, &state).await;
            }

            _ = signal::ctrl_c() => {
                ui::info("Shutting down preview server...");
                break;
            }

            result = &mut server_handle => {
                return match result {
                    Ok(Ok(())) => Err(CliError::Server("server stopped unexpectedly".to_string())),
                    Ok(Err(e)) => Err(e),
                    Err(e) => Err(CliError::Server(e.to_string())),
                };
            }
        }
    }

    ui::success("Preview server stopped");
    Ok(())
}

async fn handle_file_change(change: FileChange, builder: &BundleBuilder, state: &SharedState) {
    ui::info(&format!("File changed: {}", change.path().display()));

    state.broadcast(&DevEvent::BuildStarted).await;
    rebuild(builder, state, "Rebuild").await;
}

/// Build the bundles, store the result and tell the clients.
async fn rebuild(builder: &BundleBuilder, state: &SharedState, label: &str) {
    state.start_build();

    let task = {
        let builder = builder.clone();
        tokio::task::spawn_blocking(move || builder.build())
    };

    let event = match task.await {
        Ok(Ok((duration_ms, cache))) => {
            let size = cache.total_size();
            state.update_cache(cache);
            state.complete_build(duration_ms);
            ui::success(&format!(
                "{} completed in {} ({})",
                label,
                ui::format_duration(Duration::from_millis(duration_ms)),
                ui::format_size(size)
            ));
            DevEvent::BuildCompleted { duration_ms }
        }
        Ok(Err(e)) => {
            let error = e.to_string();
            state.fail_build(error.clone());
            ui::error(&format!("{} failed: {}", label, error));
            DevEvent::BuildFailed { error }
        }
        Err(e) => {
            let error = format!("build task failed: {}", e);
            state.fail_build(error.clone());
            ui::error(&error);
            DevEvent::BuildFailed { error }
        }
    };

    state.broadcast(&event).await;
}

/// Open the preview URL in the default browser.
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
