//! Routed path to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Resolve a routed path (decoded, slug removed) under `serve_root`,
/// handling index.html for directories.
pub fn resolve_path(routed_path: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = routed_path.trim_matches('/');

    // Reject paths with suspicious patterns early
    if clean.contains("..") {
        return None;
    }

    let local = serve_root.join(clean);

    // Canonicalize to resolve symlinks and verify path is under serve_root
    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Response body of an AJAX action: `<root>/ajax/<action>.json`.
pub fn ajax_path(action: &str, serve_root: &Path) -> Option<PathBuf> {
    let valid = !action.is_empty()
        && action
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-'));
    if !valid {
        return None;
    }
    let path = serve_root.join("ajax").join(format!("{action}.json"));
    path.is_file().then_some(path)
}
