use std::error::Error;
use std::fmt;
use std::io;

use crate::status::ExitStatus;

/// Error returned by `cmdpipe` operations.
#[derive(Debug)]
#[non_exhaustive]
pub enum PipeError {
    /// The number of `{}` placeholders in a template doesn't match the
    /// number of supplied arguments.
    ///
    /// Detected when the [`Cmd`] is constructed, before any process is
    /// spawned.
    ///
    /// [`Cmd`]: crate::Cmd
    TemplateArity {
        /// The offending template.
        template: String,
        /// Number of placeholders in the template.
        expected: usize,
        /// Number of arguments actually supplied.
        got: usize,
    },

    /// The process could not be launched.
    ///
    /// Raised synchronously by the stream constructors, before any output
    /// iterator is returned. Typical causes are a missing executable or OS
    /// resource exhaustion.
    Launch {
        /// The command line that failed to launch, for diagnostics.
        cmdline: String,
        /// The underlying OS error.
        source: io::Error,
    },

    /// An I/O error occurred while exchanging data with the process.
    ///
    /// Broken pipe on the child's stdin is *not* reported through this
    /// variant; it is the expected way for a child to signal it has read
    /// enough input.
    Io(io::Error),

    /// The process exited with a non-zero status.
    ///
    /// Only produced by the checked terminators ([`Cmd::check_call`],
    /// [`ByteStream::check`]); the core stream reports the status as data.
    ///
    /// [`Cmd::check_call`]: crate::Cmd::check_call
    /// [`ByteStream::check`]: crate::ByteStream::check
    NonZeroExit {
        /// The command line, for diagnostics.
        cmdline: String,
        /// The exact exit status of the process.
        status: ExitStatus,
    },
}

impl fmt::Display for PipeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeError::TemplateArity {
                template,
                expected,
                got,
            } => write!(
                f,
                "template {:?} has {} placeholder(s), but {} argument(s) were supplied",
                template, expected, got
            ),
            PipeError::Launch { cmdline, source } => {
                write!(f, "cannot launch {{ {} }}: {}", cmdline, source)
            }
            PipeError::Io(e) => write!(f, "I/O error: {}", e),
            PipeError::NonZeroExit { cmdline, status } => {
                write!(f, "command {{ {} }} failed with {}", cmdline, status)
            }
        }
    }
}

impl Error for PipeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipeError::Launch { source, .. } => Some(source),
            PipeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for PipeError {
    fn from(e: io::Error) -> PipeError {
        PipeError::Io(e)
    }
}
