//! Process-table enumeration for the language-server locator.

use sysinfo::System;

/// Executable name of the Antigravity language server on this platform.
/// One literal per OS/architecture, matching the IDE's bundled binary.
#[cfg(target_os = "windows")]
pub const SERVER_BINARY: &str = "language_server_windows_x64.exe";

#[cfg(all(target_os = "macos", target_arch = "aarch64"))]
pub const SERVER_BINARY: &str = "language_server_macos_arm";

#[cfg(all(target_os = "macos", not(target_arch = "aarch64")))]
pub const SERVER_BINARY: &str = "language_server_macos_x64";

#[cfg(all(target_os = "linux", target_arch = "aarch64"))]
pub const SERVER_BINARY: &str = "language_server_linux_arm";

#[cfg(all(target_os = "linux", not(target_arch = "aarch64")))]
pub const SERVER_BINARY: &str = "language_server_linux_x64";

/// A process whose executable matched the platform pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProcess {
    pub pid: u32,
    /// Full command line, arguments joined with single spaces.
    pub cmdline: String,
}

/// Enumerates candidate language-server processes.
///
/// The locator only ever sees this trait, so tests can hand it a canned
/// process table instead of the real one.
pub trait ProcessIndex: Send + Sync {
    /// All processes whose executable matches `pattern`, ascending by pid.
    fn candidates(&self, pattern: &str) -> Vec<CandidateProcess>;
}

/// `ProcessIndex` backed by the OS process table.
#[derive(Debug, Default)]
pub struct SysinfoProcessIndex;

impl ProcessIndex for SysinfoProcessIndex {
    fn candidates(&self, pattern: &str) -> Vec<CandidateProcess> {
        let mut system = System::new();
        system.refresh_processes(sysinfo::ProcessesToUpdate::All);

        let mut found = Vec::new();
        for (pid, process) in system.processes() {
            let name = process.name().to_string_lossy();
            let exe_base = process
                .exe()
                .and_then(|p| p.file_name())
                .map(|f| f.to_string_lossy().into_owned());
            if !matches_pattern(&name, exe_base.as_deref(), pattern) {
                continue;
            }

            let cmdline = process
                .cmd()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect::<Vec<String>>()
                .join(" ");
            found.push(CandidateProcess { pid: pid.as_u32(), cmdline });
        }
        found.sort_by_key(|c| c.pid);
        found
    }
}

/// The kernel truncates `/proc/<pid>/comm` to 15 bytes on Linux, so a name
/// match alone would miss the server there; the executable basename is
/// checked as well.
fn matches_pattern(name: &str, exe_basename: Option<&str>, pattern: &str) -> bool {
    if name.eq_ignore_ascii_case(pattern) {
        return true;
    }
    exe_basename.is_some_and(|base| base.eq_ignore_ascii_case(pattern))
}
