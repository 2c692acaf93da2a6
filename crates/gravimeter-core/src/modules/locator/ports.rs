//! Listening-port enumeration for a matched server process.
//!
//! There is no portable API for "which TCP ports does pid N listen on", so
//! each platform shells out to its socket-introspection tool. Parsing is a
//! pure function per tool, kept separate from the spawning so it can be
//! tested on canned output from any platform.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io;
use tokio::process::Command;

/// Lists TCP ports a process is listening on, ascending and deduplicated.
///
/// The locator only ever sees this trait, so tests can substitute a canned
/// port list for the real system tools.
#[async_trait]
pub trait PortInspector: Send + Sync {
    async fn listening_ports(&self, pid: u32) -> io::Result<Vec<u16>>;
}

/// `PortInspector` backed by lsof, ss, or netstat depending on platform.
#[derive(Debug, Default)]
pub struct SystemPortInspector;

#[async_trait]
impl PortInspector for SystemPortInspector {
    async fn listening_ports(&self, pid: u32) -> io::Result<Vec<u16>> {
        system_listening_ports(pid).await
    }
}

#[cfg(target_os = "macos")]
async fn system_listening_ports(pid: u32) -> io::Result<Vec<u16>> {
    let output = Command::new("lsof")
        .args(["-nP", "-iTCP", "-sTCP:LISTEN", "-a", "-p"])
        .arg(pid.to_string())
        .output()
        .await?;
    // lsof exits nonzero when the pid owns no sockets; that is an empty
    // result, not an error.
    Ok(parse_lsof(&String::from_utf8_lossy(&output.stdout)))
}

#[cfg(target_os = "linux")]
async fn system_listening_ports(pid: u32) -> io::Result<Vec<u16>> {
    let output = Command::new("ss").arg("-ltnp").output().await?;
    Ok(parse_ss(&String::from_utf8_lossy(&output.stdout), pid))
}

#[cfg(target_os = "windows")]
async fn system_listening_ports(pid: u32) -> io::Result<Vec<u16>> {
    let output = Command::new("netstat").args(["-ano", "-p", "TCP"]).output().await?;
    Ok(parse_netstat(&String::from_utf8_lossy(&output.stdout), pid))
}

/// `lsof -nP -iTCP -sTCP:LISTEN -a -p <pid>`: the NAME column is the
/// second-to-last field, `host:port` with the port after the last colon
/// (covers both `127.0.0.1:4242` and `[::1]:4242`).
#[cfg(any(test, target_os = "macos"))]
fn parse_lsof(output: &str) -> Vec<u16> {
    let mut ports = BTreeSet::new();
    for line in output.lines() {
        if !line.contains("(LISTEN)") {
            continue;
        }
        let Some(addr) = line.split_whitespace().rev().nth(1) else {
            continue;
        };
        if let Some(port) = addr.rsplit(':').next().and_then(|p| p.parse::<u16>().ok()) {
            ports.insert(port);
        }
    }
    ports.into_iter().collect()
}

/// `ss -ltnp` lists every listener; rows are filtered on `pid=<pid>,` in the
/// process column (the trailing comma keeps pid 123 from matching 1234).
#[cfg(any(test, target_os = "linux"))]
fn parse_ss(output: &str, pid: u32) -> Vec<u16> {
    let needle = format!("pid={pid},");
    let mut ports = BTreeSet::new();
    for line in output.lines() {
        if !line.contains(&needle) {
            continue;
        }
        // State Recv-Q Send-Q Local:Port Peer:Port Process
        let Some(local) = line.split_whitespace().nth(3) else {
            continue;
        };
        if let Some(port) = local.rsplit(':').next().and_then(|p| p.parse::<u16>().ok()) {
            ports.insert(port);
        }
    }
    ports.into_iter().collect()
}

/// `netstat -ano -p TCP`: five columns, LISTENING state in the fourth and
/// the owning pid in the fifth.
#[cfg(any(test, target_os = "windows"))]
fn parse_netstat(output: &str, pid: u32) -> Vec<u16> {
    let pid_column = pid.to_string();
    let mut ports = BTreeSet::new();
    for line in output.lines() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < 5 || columns[0] != "TCP" {
            continue;
        }
        if columns[3] != "LISTENING" || columns[4] != pid_column {
            continue;
        }
        if let Some(port) = columns[1].rsplit(':').next().and_then(|p| p.parse::<u16>().ok()) {
            ports.insert(port);
        }
    }
    ports.into_iter().collect()
}
