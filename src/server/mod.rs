//! Development server with live reload

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::commands::generate::{is_relevant_change, watched_paths};
use crate::Site;

const LIVE_RELOAD_PATH: &str = "/__livereload";

/// Appended before `</body>` of served pages
const LIVE_RELOAD_SCRIPT: &str = r#"<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
"#;

struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

/// Serve the public directory, rebuilding and reloading on changes when `watch` is set
pub async fn start(site: &Site, ip: &str, port: u16, watch: bool, open: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let state = Arc::new(ServerState {
        public_dir: site.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
    });

    let app = Router::new()
        .route(LIVE_RELOAD_PATH, get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if watch {
        let site = site.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_rebuild(site, reload_tx) {
                tracing::error!("File watcher error: {:#}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Rebuild the site whenever a source changes and notify connected pages
fn watch_and_rebuild(site: Site, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for path in watched_paths(&site) {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&path, mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
                continue;
            }
        };

        let changed: Vec<_> = events
            .iter()
            .filter(|e| is_relevant_change(&site, &e.path))
            .collect();
        if changed.is_empty() {
            continue;
        }
        for event in &changed {
            tracing::info!("File changed: {}", event.path.display());
        }

        // Reopen so config edits apply to the rebuild
        match Site::new(&site.base_dir).and_then(|fresh| fresh.generate()) {
            Ok(()) => {
                tracing::info!("Regenerated successfully");
                let _ = reload_tx.send(());
            }
            Err(e) => tracing::error!("Generation failed: {:#}", e),
        }
    }

    Ok(())
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(()) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve generated files; HTML gets the reload script when watching
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let file_path = resolve_page(&state.public_dir, request.uri().path());

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        return match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        };
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// File under `public_dir` that answers a request path
///
/// Pages are generated as `{url}/index.html`, so directories resolve to
/// their index.
fn resolve_page(public_dir: &Path, path: &str) -> PathBuf {
    let clean = path.trim_matches('/');
    if clean.is_empty() || clean.split('/').any(|part| part == "..") {
        return public_dir.join("index.html");
    }

    let candidate = public_dir.join(clean);
    if candidate.is_dir() {
        candidate.join("index.html")
    } else if candidate.exists() {
        candidate
    } else {
        let with_html = public_dir.join(format!("{}.html", clean));
        if with_html.exists() {
            with_html
        } else {
            candidate
        }
    }
}

fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}{}", &html[..pos], LIVE_RELOAD_SCRIPT, &html[pos..]),
        None => format!("{}{}", html, LIVE_RELOAD_SCRIPT),
    }
}

fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_page() {
        let tmp = TempDir::new().unwrap();
        let public = tmp.path();
        fs::create_dir_all(public.join("blog/hello")).unwrap();
        fs::write(public.join("blog/hello/index.html"), "post").unwrap();
        fs::write(public.join("404.html"), "missing").unwrap();

        assert_eq!(resolve_page(public, "/"), public.join("index.html"));
        assert_eq!(
            resolve_page(public, "/blog/hello"),
            public.join("blog/hello/index.html")
        );
        assert_eq!(
            resolve_page(public, "/blog/hello/"),
            public.join("blog/hello/index.html")
        );
        assert_eq!(resolve_page(public, "/404"), public.join("404.html"));
        assert_eq!(resolve_page(public, "/../etc"), public.join("index.html"));
    }

    #[test]
    fn test_inject_live_reload() {
        let html = inject_live_reload("<html><body><p>x</p></body></html>");
        assert!(html.starts_with("<html><body><p>x</p><script>"));
        assert!(html.ends_with("</script>\n</body></html>"));
        assert!(html.contains(LIVE_RELOAD_PATH));

        let bare = inject_live_reload("<p>x</p>");
        assert!(bare.starts_with("<p>x</p><script>"));
    }
}
