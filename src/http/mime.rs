use std::path::Path;

/// Fallback for extensions without a known type.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// MIME type for a file extension given with its leading dot, any case.
pub fn from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        ".html" | ".htm" => "text/html",
        ".css" => "text/css",
        ".js" => "application/javascript",
        ".json" => "application/json",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".svg" => "image/svg+xml",
        ".txt" => "text/plain",
        ".xml" => "application/xml",
        ".pdf" => "application/pdf",
        ".ico" => "image/x-icon",
        ".zip" => "application/zip",
        _ => DEFAULT_MIME,
    }
}

pub fn from_path(path: &Path) -> &'static str {
    extension_of(path)
        .map(|ext| from_extension(&ext))
        .unwrap_or(DEFAULT_MIME)
}

/// Lower-cased extension of `path` with its leading dot, e.g. `.html`.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
}
