use std::fmt;
use std::io::{self, ErrorKind, PipeReader, Read, Write};
use std::panic;
use std::process::{Child, ChildStdin};
use std::thread::{self, JoinHandle};

use crate::cmd::Cmd;
use crate::error::PipeError;
use crate::spawn::{self, SpawnResult};
use crate::status::ExitStatus;

/// The output of a running command, as a lazy sequence of byte chunks.
///
/// `ByteStream` is created by [`Cmd::stream`]. It owns the child process: a
/// dedicated writer thread drains the caller's input into the child's stdin
/// while the stream itself yields chunks read from the child's stdout. The
/// two directions proceeding independently is what prevents the classic
/// bidirectional-pipe deadlock, where a full OS pipe buffer blocks a thread
/// that tries to both feed and drain the same process.
///
/// Chunks are yielded in the order the child wrote them, and memory use is
/// bounded by the configured buffer size regardless of how much data flows
/// through.
///
/// When the stream reaches end-of-file, it joins the writer thread, waits
/// for the child to exit, and records its [`ExitStatus`], which is then
/// available from [`exit_status`]. Dropping the stream before exhaustion
/// terminates the child and releases every handle, so a consumer may stop
/// reading at any point.
///
/// [`Cmd::stream`]: crate::Cmd::stream
/// [`exit_status`]: Self::exit_status
#[must_use]
pub struct ByteStream {
    child: Child,
    stdout: Option<PipeReader>,
    writer: Option<JoinHandle<io::Result<()>>>,
    status: Option<ExitStatus>,
    buf_size: usize,
    cmdline: String,
}

impl ByteStream {
    pub(crate) fn start<I>(cmd: Cmd, input: I) -> Result<ByteStream, PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<Vec<u8>>,
        I::IntoIter: Send,
    {
        let Cmd {
            argv,
            cmdline,
            stderr,
            buf_size,
        } = cmd;

        let SpawnResult {
            mut child,
            stdin,
            stdout,
        } = spawn::spawn(&argv, stderr).map_err(|source| PipeError::Launch {
            cmdline: cmdline.clone(),
            source,
        })?;

        let iter = input.into_iter();
        let writer = match thread::Builder::new()
            .name("cmdpipe stdin writer".into())
            .spawn(move || feed_stdin(stdin, iter))
        {
            Ok(handle) => handle,
            Err(source) => {
                // No writer means nobody will close the child's stdin; don't
                // leave it running.
                let _ = child.kill();
                let _ = child.wait();
                return Err(PipeError::Launch { cmdline, source });
            }
        };

        Ok(ByteStream {
            child,
            stdout: Some(stdout),
            writer: Some(writer),
            status: None,
            buf_size,
            cmdline,
        })
    }

    /// Returns the command line this stream was started from.
    pub fn cmdline(&self) -> &str {
        &self.cmdline
    }

    /// Returns the exit status, if the child is known to have finished.
    ///
    /// The status becomes available once the stream has been read to
    /// end-of-file; it is set exactly once and never changes afterward.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.status
    }

    /// Drains the remaining output, discarding it, and returns the child's
    /// exit status.
    ///
    /// A non-zero status is not an error; use [`check`](Self::check) to turn
    /// it into one.
    pub fn wait(mut self) -> Result<ExitStatus, PipeError> {
        while let Some(chunk) = self.next() {
            chunk?;
        }
        Ok(self.status.unwrap_or(ExitStatus::Undetermined))
    }

    /// Like [`wait`](Self::wait), but fails with [`PipeError::NonZeroExit`]
    /// unless the child exited with status 0.
    pub fn check(self) -> Result<(), PipeError> {
        let cmdline = self.cmdline.clone();
        let status = self.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(PipeError::NonZeroExit { cmdline, status })
        }
    }

    /// Close the output pipe, join the writer thread, reap the child, and
    /// record the exit status. Runs at most once; subsequent calls are
    /// no-ops. Returns the writer's error, if it failed with anything other
    /// than the expected broken pipe.
    ///
    /// With `force`, the child is terminated first, which unblocks a writer
    /// stuck on a full stdin pipe. This is the abandonment path; a panic
    /// from the caller's input iterator is swallowed there rather than
    /// propagated out of `drop`.
    fn shutdown(&mut self, force: bool) -> Option<io::Error> {
        self.stdout.take();
        if force {
            let _ = self.child.kill();
        }
        let writer_err = match self.writer.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(payload) => {
                    if !force {
                        panic::resume_unwind(payload);
                    }
                    None
                }
            },
            None => None,
        };
        if self.status.is_none() {
            self.status = Some(match self.child.wait() {
                Ok(status) => ExitStatus::from_std(status),
                Err(_) => ExitStatus::Undetermined,
            });
        }
        writer_err
    }
}

impl Iterator for ByteStream {
    type Item = Result<Vec<u8>, PipeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let stdout = self.stdout.as_mut()?;
            let mut buf = vec![0u8; self.buf_size];
            match stdout.read(&mut buf) {
                Ok(0) => {
                    // End of output; the writer can only still be blocked on
                    // a write, which resolves once the child exits.
                    return self.shutdown(false).map(|e| Err(PipeError::Io(e)));
                }
                Ok(n) => {
                    buf.truncate(n);
                    return Some(Ok(buf));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    // A read error forces early teardown; it outranks
                    // whatever the writer may have to report.
                    let _ = self.shutdown(true);
                    return Some(Err(PipeError::Io(e)));
                }
            }
        }
    }
}

impl Drop for ByteStream {
    fn drop(&mut self) {
        if self.status.is_none() {
            let _ = self.shutdown(true);
        }
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("cmdline", &self.cmdline)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The writer thread: feed input chunks to the child's stdin, in order.
///
/// `stdin` is dropped on return, closing the child's input exactly once. A
/// broken pipe ends the writer silently; it is how a child that stopped
/// reading (e.g. `head`) signals it has seen enough input.
fn feed_stdin<I>(mut stdin: ChildStdin, input: I) -> io::Result<()>
where
    I: Iterator,
    I::Item: Into<Vec<u8>>,
{
    for chunk in input {
        if let Err(e) = stdin.write_all(&chunk.into()) {
            return if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            };
        }
    }
    Ok(())
}
