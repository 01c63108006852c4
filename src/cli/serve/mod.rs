//! Reference server: serves a directory through the dual-script pipeline.
//!
//! Requests are handled one at a time. Each request resolves its script
//! (cookie, prefix, query), picks the file for the routed path and renders
//! it for the resolved script.

mod date;
mod lifecycle;
mod path;
mod render;
mod response;

pub use lifecycle::setup_shutdown_handler;

use super::ServeArgs;
use anyhow::{Context, Result};
use date::DateTimeUtc;
use pismo::resolve::{cookie_value, split_uri};
use pismo::{
    ConfigHandle, PismoConfig, RequestKind, RequestSignals, Resolver, ResponseCookies, debug, log,
    logger,
};
use render::{BodyKind, RenderContext};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tiny_http::Request;

/// Bind the server and handle requests until Ctrl+C.
pub fn run_serve(handle: &ConfigHandle, args: &ServeArgs) -> Result<()> {
    apply_overrides(handle, args)?;
    let config = handle.get();

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    lifecycle::register_server(Arc::clone(&server));

    log!("serve"; "http://{} ({})", addr, config.serve_root().display());

    for request in server.incoming_requests() {
        if lifecycle::is_shutdown() {
            break;
        }
        reload_config(handle, args);

        let config = handle.get();
        if let Err(e) = handle_request(request, &config) {
            log!("serve"; "request error: {e:#}");
        }
    }
    Ok(())
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(handle: &ConfigHandle, args: &ServeArgs) -> Result<()> {
    let mut config = PismoConfig::clone(&handle.get());
    if let Some(root) = &args.root {
        config.serve.root = std::path::absolute(root)
            .with_context(|| format!("invalid serve root {}", root.display()))?;
    }
    if let Some(interface) = args.interface {
        config.serve.interface = interface;
    }
    if let Some(port) = args.port {
        config.serve.port = port;
    }
    config.apply_serve_defaults();
    handle.store(config);
    Ok(())
}

/// Pick up config file edits between requests. A broken file keeps the
/// previous config active.
fn reload_config(handle: &ConfigHandle, args: &ServeArgs) {
    match handle.reload() {
        Ok(true) => {
            log!("config"; "reloaded {}", handle.path().display());
            if let Err(e) = apply_overrides(handle, args) {
                log!("config"; "{e:#}");
            }
        }
        Ok(false) => {}
        Err(e) => log!("config"; "reload failed, keeping previous config: {e}"),
    }
}

fn handle_request(request: Request, config: &PismoConfig) -> Result<()> {
    let method = request.method().to_string();
    let uri = request.url().to_string();

    let resolver = Resolver::new(config);
    let kind = resolver.classify(&uri);
    let cookie = response::header_value(&request, "Cookie").and_then(|header| {
        cookie_value(&header, &config.script.cookie).map(str::to_string)
    });
    let signals = RequestSignals {
        uri: uri.clone(),
        cookie,
        kind,
    };

    let mut cookies = ResponseCookies::new();
    let state = resolver.resolve(&signals, &mut cookies);
    let root = config.serve_root();
    let (_, query) = split_uri(&uri);

    let file = match &signals.kind {
        RequestKind::Ajax { action } => path::ajax_path(action, &root),
        _ => path::resolve_path(state.routed_path(), &root),
    };
    debug!("serve"; "{} -> {:?}", uri, file);

    let ctx = RenderContext {
        config,
        state: &state,
        kind: &signals.kind,
        query,
        lastmod: None,
    };

    let Some(file) = file else {
        cookies.mark_sent();
        let custom = read_body(&ctx, &root.join("404.html"), BodyKind::Page).ok();
        logger::access(&method, &uri, 404, state.target().slug());
        return response::respond_not_found(request, custom, &cookies);
    };

    let body_kind = if matches!(signals.kind, RequestKind::Ajax { .. }) {
        BodyKind::Json
    } else {
        BodyKind::of(&file)
    };
    let ctx = RenderContext {
        lastmod: modified(&file),
        ..ctx
    };

    match read_body(&ctx, &file, body_kind) {
        Ok(body) => {
            cookies.mark_sent();
            logger::access(&method, &uri, 200, state.target().slug());
            response::send_body(request, 200, response::content_type(&file), body, &cookies)
        }
        Err(e) => {
            logger::access(&method, &uri, 500, state.target().slug());
            response::respond_error(request, &e)
        }
    }
}

/// Read a file, rendering text bodies for the resolved script.
fn read_body(ctx: &RenderContext<'_>, file: &Path, kind: BodyKind) -> Result<Vec<u8>> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    if !kind.is_text() {
        return Ok(bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => Ok(render::render(ctx, kind, text).into_bytes()),
        Err(e) => Ok(e.into_bytes()),
    }
}

/// Modification time as RFC 3339.
fn modified(file: &Path) -> Option<String> {
    let time = fs::metadata(file).and_then(|m| m.modified()).ok()?;
    Some(DateTimeUtc::from_system_time(time).to_rfc3339())
}
