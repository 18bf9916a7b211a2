//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::{Site, CONFIG_FILE};

/// Generate the static site
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let report = Generator::new(site)?.generate()?;

    tracing::info!(
        "Generated {} posts, {} pages and {} static files in {:.2}s",
        report.posts,
        report.pages,
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Directories and files whose changes trigger a rebuild
pub fn watched_paths(site: &Site) -> Vec<PathBuf> {
    [
        site.posts_dir.clone(),
        site.pages_dir.clone(),
        site.static_dir.clone(),
        site.base_dir.join(CONFIG_FILE),
    ]
    .into_iter()
    .filter(|p| p.exists())
    .collect()
}

/// Whether a changed path should trigger a rebuild
pub fn is_relevant_change(site: &Site, path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path.starts_with(&site.public_dir)
        && !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
}

/// Watch for file changes and regenerate
///
/// Config changes are picked up by reopening the site.
pub async fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for path in watched_paths(site) {
        let mode = if path.is_dir() {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        };
        watcher.watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(event) => {
                let event: notify::Event = event;
                if !event.paths.iter().any(|p| is_relevant_change(site, p)) {
                    continue;
                }
                // Debounce: only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    let result = Site::new(&site.base_dir).and_then(|fresh| run(&fresh));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
