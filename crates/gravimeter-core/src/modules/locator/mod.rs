//! Language-server discovery.
//!
//! Discovery walks four steps: enumerate matching processes, pull the CSRF
//! token (and optional port hint) off the command line, list the ports the
//! process listens on, then probe those ports in ascending order until one
//! answers. The first verified `(pid, port, token)` triple wins.

mod cmdline;
mod index;
mod ports;
mod probe;

pub use cmdline::{extract_csrf_token, extract_port_hint, workspace_id};
pub use index::{CandidateProcess, ProcessIndex, SysinfoProcessIndex, SERVER_BINARY};
pub use ports::{PortInspector, SystemPortInspector};
pub use probe::{verify_port, PROBE_PATH};

use crate::error::{CoreError, CoreResult};
use crate::utils::http::probe_client;
use gravimeter_types::ProcessInfo;
use std::path::Path;
use std::sync::Arc;

/// Finds the running Antigravity language server.
pub struct ProcessLocator {
    index: Arc<dyn ProcessIndex>,
    inspector: Arc<dyn PortInspector>,
}

impl ProcessLocator {
    /// Locator backed by the real process table and socket tools.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(SysinfoProcessIndex), Arc::new(SystemPortInspector))
    }

    /// Locator with injected enumeration strategies (used by tests).
    pub fn with_parts(index: Arc<dyn ProcessIndex>, inspector: Arc<dyn PortInspector>) -> Self {
        Self { index, inspector }
    }

    /// Find the language server and return verified connection parameters.
    ///
    /// `None` is the uniform negative: no matching process, no token on its
    /// command line, no listening ports, and no port passing the probe all
    /// collapse into it. Callers react the same way to each, so the
    /// distinction only survives in the logs.
    pub async fn locate(&self, workspace_hint: Option<&Path>) -> Option<ProcessInfo> {
        match self.locate_inner(workspace_hint).await {
            Ok(info) => {
                tracing::info!(%info, "language server located");
                Some(info)
            },
            Err(e) => {
                tracing::debug!("locate failed: {e}");
                None
            },
        }
    }

    async fn locate_inner(&self, workspace_hint: Option<&Path>) -> CoreResult<ProcessInfo> {
        let candidates = self.index.candidates(SERVER_BINARY);
        if candidates.is_empty() {
            return Err(CoreError::ProcessNotFound(format!("no {SERVER_BINARY} process")));
        }

        let candidate = pick_candidate(&candidates, workspace_hint);
        let token = extract_csrf_token(&candidate.cmdline).ok_or_else(|| {
            CoreError::ProcessNotFound(format!("pid {} has no csrf token", candidate.pid))
        })?;

        let mut ports = self.inspector.listening_ports(candidate.pid).await?;
        if ports.is_empty() {
            return Err(CoreError::PortUnreachable(format!(
                "pid {} has no listening TCP ports",
                candidate.pid
            )));
        }
        // The advertised port joins the pool; it is not always the real one.
        if let Some(hint) = extract_port_hint(&candidate.cmdline) {
            if !ports.contains(&hint) {
                ports.push(hint);
                ports.sort_unstable();
            }
        }

        let client = probe_client()?;
        for port in ports {
            if verify_port(&client, port, &token).await {
                return Ok(ProcessInfo { pid: candidate.pid, port, token });
            }
        }
        Err(CoreError::PortUnreachable(format!(
            "no port of pid {} answered the probe",
            candidate.pid
        )))
    }
}

impl Default for ProcessLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the candidate whose command line mentions the hinted workspace,
/// falling back to the lowest pid when the hint is absent or unmatched.
fn pick_candidate<'a>(
    candidates: &'a [CandidateProcess],
    workspace_hint: Option<&Path>,
) -> &'a CandidateProcess {
    if let Some(path) = workspace_hint {
        let id = workspace_id(path);
        if let Some(matched) = candidates.iter().find(|c| c.cmdline.contains(&id)) {
            return matched;
        }
        tracing::debug!(workspace = %id, "no candidate matches workspace hint");
    }
    &candidates[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn candidate(pid: u32, cmdline: &str) -> CandidateProcess {
        CandidateProcess { pid, cmdline: cmdline.to_string() }
    }

    #[test]
    fn hint_selects_matching_candidate() {
        let candidates = vec![
            candidate(10, "ls --csrf_token=a --workspace_id=file_home_me_alpha"),
            candidate(20, "ls --csrf_token=b --workspace_id=file_home_me_beta"),
        ];
        let picked = pick_candidate(&candidates, Some(&PathBuf::from("/home/me/beta")));
        assert_eq!(picked.pid, 20);
    }

    #[test]
    fn unmatched_hint_falls_back_to_first() {
        let candidates = vec![
            candidate(10, "ls --csrf_token=a --workspace_id=file_home_me_alpha"),
            candidate(20, "ls --csrf_token=b --workspace_id=file_home_me_beta"),
        ];
        let picked = pick_candidate(&candidates, Some(&PathBuf::from("/home/me/gamma")));
        assert_eq!(picked.pid, 10);
        assert_eq!(pick_candidate(&candidates, None).pid, 10);
    }
}
