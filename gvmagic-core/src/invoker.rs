//! Render Invoker — one `dot -Tsvg` child process per request.
//!
//! ## Protocol
//!
//! 1. Spawn `<executable> -Tsvg` with all three standard streams piped.
//! 2. Write the description to stdin on a writer thread, then close it.
//! 3. Drain stdout and stderr on two reader threads so neither pipe can fill
//!    up and stall the child.
//! 4. Wait for exit (polling when a timeout is set).
//! 5. Zero exit: stdout verbatim. Non-zero exit: status plus stderr.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{io_err, RenderError};
use crate::types::{ExecutableRef, Located, SvgImage, OUTPUT_FORMAT};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Anything that turns a graph description into SVG bytes.
///
/// The magics are written against this trait so hosts and tests can swap the
/// process-backed [`DotRenderer`] for something else.
pub trait SvgRenderer {
    fn render_svg(&self, source: &str) -> Result<SvgImage, RenderError>;
}

/// Runs the located layout engine. Immutable and shareable across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotRenderer {
    executable: ExecutableRef,
    timeout: Option<Duration>,
}

impl DotRenderer {
    pub fn new(executable: ExecutableRef) -> Self {
        Self {
            executable,
            timeout: None,
        }
    }

    /// Kill the child and fail with [`RenderError::Timeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn executable(&self) -> &ExecutableRef {
        &self.executable
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Render `text` to SVG. Blocks until the child exits.
    pub fn render(&self, text: &str) -> Result<SvgImage, RenderError> {
        let started_at = Instant::now();
        let program = self.executable.to_string();

        tracing::debug!(program = %program, input_bytes = text.len(), "spawning layout engine");
        let mut child = Command::new(self.executable.program())
            .arg(format!("-T{OUTPUT_FORMAT}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        let writer = spawn_writer(child.stdin.take(), text.as_bytes().to_vec());
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                // A grandchild may still hold the pipes open; the detached
                // threads finish once it lets go.
                drop((writer, stdout, stderr));
                let after = self.timeout.unwrap_or_default();
                tracing::warn!(program = %program, timeout_ms = after.as_millis() as u64, "layout engine timed out");
                return Err(RenderError::Timeout { program, after });
            }
            Err(err) => return Err(err),
        };

        let write_result = join(writer);
        let stdout = join(stdout)?;
        let stderr = join(stderr)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            tracing::warn!(
                program = %program,
                exit_code = status.code().map(i64::from).unwrap_or(-1),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                stderr = %stderr,
                "layout engine failed"
            );
            return Err(RenderError::Exit {
                program,
                code: status.code(),
                stderr,
            });
        }

        match write_result {
            Ok(()) => {}
            // The child exited cleanly without consuming all of its input.
            Err(RenderError::Io { source, .. }) if source.kind() == io::ErrorKind::BrokenPipe => {}
            Err(err) => return Err(err),
        }

        tracing::info!(
            program = %program,
            svg_bytes = stdout.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "rendered graph"
        );
        Ok(SvgImage(stdout))
    }

    /// `Ok(None)` means the timeout expired and the child was killed.
    fn wait(&self, child: &mut Child) -> Result<Option<ExitStatus>, RenderError> {
        let Some(timeout) = self.timeout else {
            return child
                .wait()
                .map(Some)
                .map_err(|e| io_err("waiting for the layout engine", e));
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| io_err("waiting for the layout engine", e))?
            {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                child
                    .kill()
                    .map_err(|e| io_err("killing the layout engine", e))?;
                child
                    .wait()
                    .map_err(|e| io_err("reaping the layout engine", e))?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl From<Located> for DotRenderer {
    fn from(located: Located) -> Self {
        Self::new(located.executable)
    }
}

impl SvgRenderer for DotRenderer {
    fn render_svg(&self, source: &str) -> Result<SvgImage, RenderError> {
        self.render(source)
    }
}

// ---------------------------------------------------------------------------
// Pipe helpers
// ---------------------------------------------------------------------------

type Worker<T> = JoinHandle<Result<T, RenderError>>;

fn spawn_writer<W: Write + Send + 'static>(stdin: Option<W>, input: Vec<u8>) -> Worker<()> {
    thread::spawn(move || {
        if let Some(mut stdin) = stdin {
            stdin
                .write_all(&input)
                .and_then(|()| stdin.flush())
                .map_err(|e| io_err("writing to the layout engine", e))?;
        }
        // Dropping stdin closes the pipe and signals end of input.
        Ok(())
    })
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> Worker<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            stream
                .read_to_end(&mut buf)
                .map_err(|e| io_err("reading from the layout engine", e))?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: Worker<T>) -> Result<T, RenderError> {
    handle.join().unwrap_or_else(|_| {
        Err(io_err(
            "joining a pipe thread",
            io::Error::new(io::ErrorKind::Other, "pipe thread panicked"),
        ))
    })
}
