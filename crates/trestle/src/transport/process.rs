//! Transport over a resolver executable spawned as a child process.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::protocol::{Request, Response};

use super::Transport;

/// Receives everything the resolver process writes to stderr.
///
/// Called from the drain thread with one chunk at a time, converted to
/// UTF-8 on a best-effort basis.
pub type ErrorOutputHandler = Box<dyn FnMut(String) + Send + 'static>;

/// A transport that spawns the resolver executable and owns its three
/// standard streams.
///
/// Stdout carries the newline-delimited request/response stream, starting
/// with the peer's one-time bundle identifier announcement. Stderr is
/// drained continuously on a dedicated thread so a chatty resolver cannot
/// fill the stderr pipe and deadlock a blocked stdout read.
///
/// Dropping the transport terminates the process: kill, reap, then join
/// the stderr drain.
#[derive(Debug)]
pub struct ChildProcessTransport {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr_drain: Option<JoinHandle<()>>,
}

impl ChildProcessTransport {
    /// Spawn the resolver at `resolver_path`.
    ///
    /// Everything the process writes to stderr is forwarded to
    /// `error_output_handler` chunk by chunk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingResolver`] when no file exists at the path,
    /// [`Error::ResolverNotExecutable`] when the file cannot be executed,
    /// and [`Error::Io`] for any other spawn failure.
    pub fn spawn(
        resolver_path: &Path,
        mut error_output_handler: ErrorOutputHandler,
    ) -> Result<Self> {
        validate_resolver(resolver_path)?;

        debug!(resolver = %resolver_path.display(), "Starting external resolver process");

        let mut child = Command::new(resolver_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::missing_resolver(resolver_path),
                std::io::ErrorKind::PermissionDenied => Error::not_executable(resolver_path),
                _ => Error::Io(e),
            })?;

        let stdin = child.stdin.take().expect("stdin was piped");
        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let drain = std::thread::Builder::new()
            .name("resolver-stderr-drain".to_string())
            .spawn(move || {
                let mut reader = BufReader::new(stderr);
                let mut chunk = [0u8; 4096];
                loop {
                    match reader.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            error_output_handler(String::from_utf8_lossy(&chunk[..n]).into_owned());
                        }
                    }
                }
            });

        let stderr_drain = match drain {
            Ok(handle) => handle,
            Err(e) => {
                // The process is already running; release it before failing.
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Io(e));
            }
        };

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr_drain: Some(stderr_drain),
        })
    }

    /// The child's exit code, when it has exited and the code is known.
    fn exit_code(&mut self) -> Option<i32> {
        self.child.try_wait().ok().flatten().and_then(|s| s.code())
    }
}

impl Transport for ChildProcessTransport {
    fn send_and_wait(&mut self, request: Option<&Request>) -> Result<Response> {
        if let Some(request) = request {
            let line = request.to_line()?;
            trace!(request = %request, "Sending request to external resolver");
            let written = self
                .stdin
                .write_all(line.as_bytes())
                .and_then(|()| self.stdin.flush());
            if let Err(e) = written {
                // A closed stdin means the process is gone; report that
                // rather than the raw pipe error.
                if e.kind() == std::io::ErrorKind::BrokenPipe {
                    return Err(Error::ProcessDidExit {
                        exit_code: self.exit_code(),
                    });
                }
                return Err(Error::Io(e));
            }
        }

        // Read one full reply line rather than whatever happens to be
        // buffered, so a peer that writes its reply in several syscalls
        // still frames correctly.
        let mut reply = String::new();
        let read = self.stdout.read_line(&mut reply)?;
        if read == 0 {
            let exit_code = self.exit_code();
            debug!(?exit_code, "External resolver closed its stdout");
            return Err(Error::ProcessDidExit { exit_code });
        }

        trace!(bytes = read, "Received reply from external resolver");
        Response::from_line(&reply)
    }
}

impl Drop for ChildProcessTransport {
    fn drop(&mut self) {
        debug!("Terminating external resolver process");

        if let Err(e) = self.child.kill() {
            // InvalidInput means the process already exited.
            if e.kind() != std::io::ErrorKind::InvalidInput {
                warn!(error = %e, "Failed to kill external resolver process during cleanup");
            }
        }

        // Reap the process to prevent zombies; stderr closes with it,
        // which ends the drain thread.
        let _ = self.child.wait();
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Check that a resolver executable exists and can be executed, before
/// attempting to spawn it.
fn validate_resolver(path: &Path) -> Result<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::missing_resolver(path));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    if !metadata.is_file() {
        return Err(Error::not_executable(path));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(Error::not_executable(path));
        }
    }

    Ok(())
}
