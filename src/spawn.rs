use std::ffi::OsString;
use std::io::{self, ErrorKind, PipeReader};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::cmd::Stderr;

pub(crate) struct SpawnResult {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: PipeReader,
}

/// Launch a child process with stdin and stdout redirected to pipes.
///
/// This is the internal entry point for creating processes. The parent keeps
/// the write end of the stdin pipe and the read end of the stdout pipe;
/// stderr is wired according to `stderr`, with `Merge` sharing the stdout
/// pipe's write end.
pub(crate) fn spawn(argv: &[OsString], stderr: Stderr) -> io::Result<SpawnResult> {
    if argv.is_empty() {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            "argv must not be empty",
        ));
    }

    let (reader, writer) = io::pipe()?;

    let mut command = Command::new(&argv[0]);
    command.args(&argv[1..]).stdin(Stdio::piped());
    match stderr {
        Stderr::Inherit => command.stderr(Stdio::inherit()),
        Stderr::Merge => command.stderr(writer.try_clone()?),
        Stderr::Null => command.stderr(Stdio::null()),
    };
    command.stdout(writer);

    let mut child = command.spawn()?;
    // Drop the parent's copies of the pipe write ends held by `command`, so
    // the reader sees EOF exactly when the child closes its output.
    drop(command);

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::other("child stdin was not piped"))?;

    Ok(SpawnResult {
        child,
        stdin,
        stdout: reader,
    })
}
