//! Connection descriptor for the discovered language-server process.

use serde::{Deserialize, Serialize};

/// Working connection parameters for the target process.
///
/// Transient: recomputed on detection and discarded on the first fetch
/// failure. Owned exclusively by the watcher; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessInfo {
    /// OS process id of the matched language server
    pub pid: u32,
    /// Verified API port on 127.0.0.1
    pub port: u16,
    /// CSRF token extracted from the process command line
    pub token: String,
}

// Token is a credential: Display keeps it out of logs and terminal output.
impl std::fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pid {} port {} token ***", self.pid, self.port)
    }
}
