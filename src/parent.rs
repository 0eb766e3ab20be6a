//! Parent-process watcher.
//!
//! The host passes its pid on the command line. If the host dies without
//! closing our stdin (killed, crashed), the worker would otherwise block on a
//! read forever, so the binary races [`wait_for_parent_exit`] against the
//! serve loop.

use std::time::Duration;

/// How often the parent's liveness is checked.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Resolve once process `pid` no longer exists.
///
/// On platforms without a liveness check this never resolves.
pub async fn wait_for_parent_exit(pid: u32, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match is_process_alive(pid) {
            Some(true) => {}
            Some(false) => {
                tracing::warn!("Parent process {} exited", pid);
                return;
            }
            None => {
                tracing::debug!("Parent process checks are not supported on this platform");
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Whether `pid` refers to a live process; `None` if this cannot be checked.
#[cfg(unix)]
pub fn is_process_alive(pid: u32) -> Option<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return Some(false);
    };

    // Signal 0 only performs the existence and permission checks.
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => Some(true),
        Err(Errno::EPERM) => Some(true),
        Err(_) => Some(false),
    }
}

/// Whether `pid` refers to a live process; `None` if this cannot be checked.
#[cfg(not(unix))]
pub fn is_process_alive(_pid: u32) -> Option<bool> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_own_process_is_alive() {
        assert_eq!(is_process_alive(std::process::id()), Some(true));
    }

    #[cfg(unix)]
    #[test]
    fn test_out_of_range_pid_is_dead() {
        assert_eq!(is_process_alive(u32::MAX), Some(false));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_returns_for_exited_child() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        tokio::time::timeout(
            Duration::from_secs(5),
            wait_for_parent_exit(pid, Duration::from_millis(10)),
        )
        .await
        .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_wait_pends_while_alive() {
        let pid = std::process::id();
        let result = tokio::time::timeout(
            Duration::from_millis(50),
            wait_for_parent_exit(pid, Duration::from_millis(10)),
        )
        .await;
        assert!(result.is_err());
    }
}
