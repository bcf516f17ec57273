use std::ffi::{OsStr, OsString};
use std::fmt;

use crate::error::PipeError;
use crate::pipe::ByteStream;
use crate::status::ExitStatus;
use crate::template::{Arg, format_cmd, quote};
use crate::text::{LineStream, TextStream};

#[cfg(unix)]
mod os {
    pub const SHELL: [&str; 2] = ["sh", "-c"];
}

#[cfg(windows)]
mod os {
    pub const SHELL: [&str; 2] = ["cmd.exe", "/c"];
}

const DEFAULT_BUF_SIZE: usize = 4096;

/// What to do with the child's standard error.
///
/// The output stream only ever carries the child's standard output; standard
/// error is either left alone, folded into that stream, or discarded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stderr {
    /// Inherit the parent's standard error. This is the default.
    Inherit,
    /// Merge standard error into the output stream, like `2>&1` in the
    /// shell.
    Merge,
    /// Discard standard error (`/dev/null` on Unix, `nul` on Windows).
    Null,
}

/// A command, ready to be applied to an input stream.
///
/// `Cmd` pairs an argument vector with I/O options. It is usually built from
/// a template with [`new`], which substitutes positional values into `{}`
/// placeholders with shell-safe quoting and runs the result through the OS
/// shell; or from an explicit argument vector with [`from_argv`], which
/// involves no shell at all.
///
/// A `Cmd` is consumed by one of its terminators: [`stream`] yields the
/// child's output as byte chunks, [`stream_text`] and [`lines`] as decoded
/// text, while [`call`] and [`check_call`] discard the output and report
/// only the exit status.
///
/// # Examples
///
/// Pipe text through a command and collect the result:
///
/// ```no_run
/// # use cmdpipe::Cmd;
/// # fn dummy() -> Result<(), cmdpipe::PipeError> {
/// let out = Cmd::new("tr a-z A-Z", [])?
///     .stream_text(["hello"])?
///     .collect::<Result<String, _>>()?;
/// assert_eq!(out, "HELLO");
/// # Ok(())
/// # }
/// ```
///
/// Values substituted into the template survive any metacharacters:
///
/// ```no_run
/// # use cmdpipe::Cmd;
/// # fn dummy() -> Result<(), cmdpipe::PipeError> {
/// Cmd::new("rm -f {}", ["weird; name|$x".into()])?
///     .check_call(std::iter::empty::<Vec<u8>>())?;
/// # Ok(())
/// # }
/// ```
///
/// A template may contain a whole shell pipeline:
///
/// ```no_run
/// # use cmdpipe::Cmd;
/// # fn dummy() -> Result<(), cmdpipe::PipeError> {
/// for line in Cmd::new("find {} -name {} | sort", ["src".into(), "*.rs".into()])?
///     .lines(std::iter::empty::<String>())?
/// {
///     println!("{}", line?.trim_end());
/// }
/// # Ok(())
/// # }
/// ```
///
/// [`new`]: Self::new
/// [`from_argv`]: Self::from_argv
/// [`stream`]: Self::stream
/// [`stream_text`]: Self::stream_text
/// [`lines`]: Self::lines
/// [`call`]: Self::call
/// [`check_call`]: Self::check_call
#[derive(Clone)]
#[must_use]
pub struct Cmd {
    pub(crate) argv: Vec<OsString>,
    pub(crate) cmdline: String,
    pub(crate) stderr: Stderr,
    pub(crate) buf_size: usize,
}

impl Cmd {
    /// Constructs a `Cmd` from a template with `{}` placeholders.
    ///
    /// Each placeholder is replaced by the corresponding argument;
    /// [`Arg::Value`] arguments (the `From<&str>`/`From<String>` default)
    /// are quoted so the shell passes them through as single, uninterpreted
    /// arguments, while [`Arg::raw`] fragments are inserted verbatim. The
    /// formatted command line is handed to the OS shell (`sh -c` on Unix,
    /// `cmd.exe /c` on Windows), so the template itself may use shell
    /// syntax such as `|`.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::TemplateArity`] when the placeholder count and
    /// the argument count differ. No process is spawned in that case.
    pub fn new(template: &str, args: impl IntoIterator<Item = Arg>) -> Result<Cmd, PipeError> {
        let args: Vec<Arg> = args.into_iter().collect();
        let cmdline = format_cmd(template, &args)?;
        let mut argv: Vec<OsString> = os::SHELL.iter().map(OsString::from).collect();
        argv.push(OsString::from(&cmdline));
        Ok(Cmd {
            argv,
            cmdline,
            stderr: Stderr::Inherit,
            buf_size: DEFAULT_BUF_SIZE,
        })
    }

    /// Constructs a `Cmd` from an explicit argument vector.
    ///
    /// The first element is the executable, the rest its arguments; no shell
    /// is involved and nothing is quoted or re-parsed. Launching an empty
    /// vector or a nonexistent executable fails with [`PipeError::Launch`]
    /// at stream time.
    pub fn from_argv(argv: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Cmd {
        let argv: Vec<OsString> = argv.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let cmdline = argv
            .iter()
            .map(|a| quote(&a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        Cmd {
            argv,
            cmdline,
            stderr: Stderr::Inherit,
            buf_size: DEFAULT_BUF_SIZE,
        }
    }

    /// Specifies what to do with the child's standard error.
    pub fn stderr(mut self, stderr: Stderr) -> Cmd {
        self.stderr = stderr;
        self
    }

    /// Sets the size of the chunks read from the child's output.
    ///
    /// The default is 4096 bytes. A size of 1 effectively unbuffers the
    /// output, at a cost in syscalls.
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0.
    pub fn buffer_size(mut self, size: usize) -> Cmd {
        assert!(size > 0, "buffer size must be positive");
        self.buf_size = size;
        self
    }

    /// Returns the command line this `Cmd` will run, for diagnostics.
    pub fn cmdline(&self) -> &str {
        &self.cmdline
    }

    // Terminators

    /// Starts the command, feeding it `input` and returning its output as a
    /// lazy stream of byte chunks.
    ///
    /// The input is drained by a dedicated writer thread, so an arbitrarily
    /// long (even infinite) iterator can be used without buffering it, and
    /// without deadlocking against the child's output. Use
    /// `std::iter::empty::<Vec<u8>>()` when the command needs no input.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Launch`] if the process cannot be started. Once
    /// the stream is returned, launching has succeeded.
    pub fn stream<I>(self, input: I) -> Result<ByteStream, PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<Vec<u8>>,
        I::IntoIter: Send,
    {
        ByteStream::start(self, input)
    }

    /// Like [`stream`](Self::stream), but exchanges text instead of bytes.
    ///
    /// Input chunks are encoded as UTF-8; output chunks are decoded
    /// incrementally, with multi-byte sequences split across chunk
    /// boundaries handled correctly and invalid sequences replaced by
    /// `U+FFFD`.
    pub fn stream_text<I>(self, input: I) -> Result<TextStream, PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<String>,
        I::IntoIter: Send,
    {
        let bytes = input.into_iter().map(|s| s.into().into_bytes());
        Ok(TextStream::new(self.stream(bytes)?))
    }

    /// Like [`stream_text`](Self::stream_text), but yields output buffered
    /// into `\n`-terminated lines (terminator included).
    pub fn lines<I>(self, input: I) -> Result<LineStream, PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<String>,
        I::IntoIter: Send,
    {
        Ok(LineStream::new(self.stream_text(input)?))
    }

    /// Runs the command to completion, discarding its output, and returns
    /// its exit status.
    pub fn call<I>(self, input: I) -> Result<ExitStatus, PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<Vec<u8>>,
        I::IntoIter: Send,
    {
        self.stream(input)?.wait()
    }

    /// Like [`call`](Self::call), but fails with [`PipeError::NonZeroExit`]
    /// unless the command exited with status 0.
    pub fn check_call<I>(self, input: I) -> Result<(), PipeError>
    where
        I: IntoIterator + Send + 'static,
        I::Item: Into<Vec<u8>>,
        I::IntoIter: Send,
    {
        self.stream(input)?.check()
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cmd {{ {} }}", self.cmdline)
    }
}
