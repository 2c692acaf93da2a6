//! Command-line extraction for matched server processes.
//!
//! The language server advertises its CSRF token (and sometimes a port) as
//! plain process arguments, in both `--flag value` and `--flag=value` form.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CSRF_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--csrf_token[= ]([A-Za-z0-9-]+)").expect("csrf token regex is valid")
});

static PORT_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--extension_server_port[= ](\d+)").expect("port hint regex is valid")
});

/// Extract the CSRF token from a joined command line.
///
/// Tokens are UUID-shaped (letters, digits, hyphens). Without one the
/// process cannot be queried at all.
pub fn extract_csrf_token(cmdline: &str) -> Option<String> {
    CSRF_TOKEN_RE
        .captures(cmdline)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the advertised extension-server port, if any.
///
/// Only a hint: the advertised port is not always the one the status API
/// listens on, so it joins the probe list rather than short-circuiting it.
pub fn extract_port_hint(cmdline: &str) -> Option<u16> {
    PORT_HINT_RE
        .captures(cmdline)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Canonical workspace identifier the IDE embeds in its server arguments.
///
/// `/Users/me/My Project` becomes `file_Users_me_My%20Project`: a `file`
/// prefix, path separators turned into underscores, spaces into `%20`.
/// Used only to pick among candidate processes, never for display.
pub fn workspace_id(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut id = String::with_capacity(raw.len() + 8);
    id.push_str("file");
    if !raw.starts_with(['/', '\\']) {
        id.push('_');
    }
    for ch in raw.chars() {
        match ch {
            '/' | '\\' => id.push('_'),
            ' ' => id.push_str("%20"),
            other => id.push(other),
        }
    }
    id
}
