//! Media type detection for asset files.

use std::path::Path;

/// SVG media type, which gets percent encoding instead of base64.
pub const SVG: &str = "image/svg+xml";

/// Fallback media type for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect a media type from the file extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`
/// rather than failing; the asset still inlines, just without a specific type.
pub fn from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("svg") => SVG,
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",
        Some("bmp") => "image/bmp",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("css") => "text/css",
        Some("js" | "mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",
        _ => OCTET_STREAM,
    }
}
