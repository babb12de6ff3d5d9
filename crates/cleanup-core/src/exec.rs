//! Resolve-and-run helper for the external CLIs (helm, kubectl, rdu).
//!
//! Uses dedicated threads for stdout/stderr reading (avoiding pipe-buffer
//! deadlocks) and a waiter thread with `mpsc::recv_timeout` for timeout
//! support. Execution problems never escape as errors: a missing binary,
//! spawn failure, or timeout all come back as an `ExecOutput` with the
//! `-1` sentinel code, so one command's failure cannot abort a batch.

use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ExecOutput
// ---------------------------------------------------------------------------

/// Captured result of one external command. `code` is the process exit
/// code, or `-1` when the command timed out or could not be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: -1,
        }
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Run `program` with `args`, capturing output, killing the process once
/// `timeout` elapses. The program is resolved on PATH up front so a
/// missing binary fails explicitly instead of attempting partial execution.
pub fn run(program: &str, args: &[&str], timeout: Duration) -> ExecOutput {
    let resolved = match which::which(program) {
        Ok(path) => path,
        Err(e) => return ExecOutput::failure(format!("command not found: {program}: {e}")),
    };

    let mut child = match Command::new(&resolved)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return ExecOutput::failure(format!("failed to spawn {program}: {e}")),
    };

    let child_pid = child.id();

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let stdout_thread = std::thread::spawn(move || read_all(stdout_handle));
    let stderr_thread = std::thread::spawn(move || read_all(stderr_handle));

    // The child is moved to a waiter thread; on timeout we kill by PID and
    // the waiter unblocks once the killed process exits.
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });

    let status = match rx.recv_timeout(timeout) {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => return ExecOutput::failure(format!("wait failed: {e}")),
        Err(_) => {
            kill_process(child_pid);
            return ExecOutput::failure(format!(
                "command timed out after {}s",
                timeout.as_secs()
            ));
        }
    };

    let stdout = stdout_thread.join().unwrap_or_default();
    let stderr = stderr_thread.join().unwrap_or_default();

    ExecOutput {
        stdout,
        stderr,
        code: status.code().unwrap_or(-1),
    }
}

fn read_all<R: Read>(handle: Option<R>) -> String {
    let mut buf = String::new();
    if let Some(mut reader) = handle {
        let _ = reader.read_to_string(&mut buf);
    }
    buf
}

/// Terminate a process by PID using SIGKILL. Best-effort; errors are
/// silently ignored.
fn kill_process(pid: u32) {
    let _ = Command::new("kill")
        .arg("-9")
        .arg(pid.to_string())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
