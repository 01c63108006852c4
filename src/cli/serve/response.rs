//! HTTP response handlers.

use anyhow::{Result, anyhow};
use pismo::ResponseCookies;
use std::path::Path;
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Common MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";
    pub const SVG: &str = "image/svg+xml";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const ICO: &str = "image/x-icon";
    pub const WOFF2: &str = "font/woff2";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess MIME type from file extension.
pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => types::HTML,
        Some("txt") => types::PLAIN,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json") => types::JSON,
        Some("xml") => types::XML,
        Some("rss") => types::RSS,
        Some("atom") => types::ATOM,
        Some("svg") => types::SVG,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("ico") => types::ICO,
        Some("woff2") => types::WOFF2,
        _ => types::OCTET_STREAM,
    }
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

/// Value of a request header (case-insensitive name).
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {key}: {value}"))
}

/// Send `body` with the cookies collected while resolving the request.
pub fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    cookies: &ResponseCookies,
) -> Result<()> {
    let head = is_head_request(&request);
    let mut headers = vec![make_header("Content-Type", content_type)?];
    for cookie in cookies.header_values() {
        headers.push(make_header("Set-Cookie", &cookie)?);
    }

    let body = if head { Vec::new() } else { body };
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    for header in headers {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with 404 (custom `404.html` under the root or plain text).
pub fn respond_not_found(request: Request, custom: Option<Vec<u8>>, cookies: &ResponseCookies) -> Result<()> {
    match custom {
        Some(body) => send_body(request, 404, types::HTML, body, cookies),
        None => send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec(), cookies),
    }
}

/// Respond with 500 and the error chain.
pub fn respond_error(request: Request, error: &anyhow::Error) -> Result<()> {
    let body = format!("500 Internal Server Error\n\n{error:#}");
    send_body(request, 500, types::PLAIN, body.into_bytes(), &ResponseCookies::new())
}
