//! Development server.
//!
//! A lightweight HTTP server for local development, built on `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - The authoring API under `/<admin.route>/api/` (development mode only)
//! - File watching and auto-rebuild (via `watch` module)
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//!    Serve files             Detect changes
//!    Admin API writes ──────► Trigger rebuild
//!    content files
//! ```

use crate::{
    admin::api::AdminApi,
    build::build_site,
    config::{SiteConfig, cfg},
    log,
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, bail};
use std::{
    fs,
    io::{Cursor, Read},
    net::SocketAddr,
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the development server with optional file watching.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Spawns file watcher thread (if enabled)
/// 4. Enters the main request handling loop
///
/// The server blocks until Ctrl+C is received.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: std::net::IpAddr = c.serve.interface.parse()?;
    let base_port = c.serve.port;

    let (server, addr) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    let api = if c.admin_enabled() {
        log!("admin"; "http://{}/{}/", addr, c.admin.route());
        Some(AdminApi::new(&c)?)
    } else {
        None
    };

    // Spawn file watcher thread
    if c.serve.watch {
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking() {
                log!("watch"; "{err}");
            }
        });
    }

    // Handle requests in main thread (blocks until Ctrl+C)
    for request in server.incoming_requests() {
        // Re-load config on each request to pick up hot-reloaded changes
        let config = cfg();
        let api_route = api
            .as_ref()
            .and_then(|api| Some((api, api_path(request.url(), config.admin.route())?)));

        let result = match api_route {
            Some((api, path)) => handle_api(request, api, &path, &config),
            None => handle_request(request, &config),
        };
        if let Err(e) = result {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    bail!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )
}

// ============================================================================
// Request Handling
// ============================================================================

/// Strip the query string and URL-decode a request path.
fn decode_path(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    urlencoding::decode(path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default()
}

/// Path below `/<route>/api/`, if the request targets the authoring API.
fn api_path(url: &str, route: &str) -> Option<String> {
    let path = decode_path(url);
    let rest = path.trim_start_matches('/').strip_prefix(route)?;
    rest.strip_prefix("/api/").map(str::to_owned)
}

/// Handle a static file request.
///
/// Request resolution order:
/// 1. Exact file match → serve file
/// 2. Directory with index.html → serve index.html
/// 3. Nothing found → 404
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    let url_path = decode_path(request.url());
    let request_path = url_path.trim_matches('/');
    if request_path.split('/').any(|part| part == "..") {
        return serve_not_found(request);
    }
    let local_path = config.build.output.join(request_path);

    if local_path.is_file() {
        return serve_file(request, &local_path);
    }

    let index_path = local_path.join("index.html");
    if index_path.is_file() {
        return serve_file(request, &index_path);
    }

    serve_not_found(request)
}

/// Handle an authoring API request. Writes rebuild the site unless the
/// watcher is running, which picks the change up itself.
fn handle_api(mut request: Request, api: &AdminApi, path: &str, config: &SiteConfig) -> Result<()> {
    let mut body = Vec::new();
    request
        .as_reader()
        .read_to_end(&mut body)
        .context("Failed to read request body")?;

    let method = request.method().clone();
    let response = api.handle(&method, path, &body);
    log!("admin"; "{} {} → {}", method, path, response.status);

    if response.wrote
        && !config.serve.watch
        && let Err(err) = build_site(config)
    {
        log!("error"; "rebuild failed: {err:#}");
    }

    let json = serde_json::to_string(&response.body)?;
    let response = Response::from_string(json)
        .with_status_code(StatusCode(response.status))
        .with_header(header("Content-Type", "application/json; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Response Helpers
// ============================================================================

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow::anyhow!("invalid header `{name}`"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = guess_content_type(path);

    let response = Response::from_data(content).with_header(header("Content-Type", content_type)?);

    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![header("Content-Type", "text/plain")?],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path() {
        assert_eq!(api_path("/admin/api/schema", "admin").as_deref(), Some("schema"));
        assert_eq!(
            api_path("/admin/api/collections/people/ada?x=1", "admin").as_deref(),
            Some("collections/people/ada")
        );
        assert_eq!(
            api_path("/admin/api/images/people/my%20face.png", "admin").as_deref(),
            Some("images/people/my face.png")
        );
        assert_eq!(api_path("/admin/", "admin"), None);
        assert_eq!(api_path("/people/", "admin"), None);
        assert_eq!(api_path("/administrator/api/schema", "admin"), None);
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/people/?t=1"), "/people/");
        assert_eq!(decode_path("/a%20b/"), "/a b/");
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("a.png")), "image/png");
        assert_eq!(guess_content_type(Path::new("a.bin")), "application/octet-stream");
    }
}
