//! Execution of external commands as functions over streams of data,
//! inspired by shell pipelines, with Rust-specific safety guarantees.
//!
//! `cmdpipe` represents a command as a function from an input stream to an
//! output stream: the caller supplies an iterator of chunks, the crate feeds
//! them to the child process's standard input from a dedicated writer
//! thread, and the child's standard output comes back as a lazily-pulled
//! iterator of chunks. Because the two directions are driven independently,
//! arbitrarily long — even unbounded — streams can be piped through a
//! process with bounded memory and without the deadlock that naive
//! bidirectional pipe usage causes.
//!
//! Commands are built from templates with `{}` placeholders. Substituted
//! values are quoted so that the shell receives each one as exactly one
//! argument, no matter what whitespace or metacharacters it contains;
//! composing shell syntax deliberately requires the explicit [`Arg::raw`]
//! escape hatch. A mismatched placeholder count is caught before anything
//! is spawned.
//!
//! # Examples
//!
//! Count lines of an unbounded-sized input without materializing it:
//!
//! ```no_run
//! # use cmdpipe::Cmd;
//! # fn dummy() -> Result<(), cmdpipe::PipeError> {
//! let out = Cmd::new("wc -l", [])?
//!     .stream_text((0..1_000_000).map(|n| format!("{}\n", n)))?
//!     .collect::<Result<String, _>>()?;
//! assert_eq!(out.trim(), "1000000");
//! # Ok(())
//! # }
//! ```
//!
//! Run a command for its effect, with safely substituted arguments:
//!
//! ```no_run
//! # use cmdpipe::Cmd;
//! # fn dummy() -> Result<(), cmdpipe::PipeError> {
//! let dirname = "my dir; rm -rf /";  // inert: passed as a single argument
//! Cmd::new("tar -czf {} {}", ["archive.tar.gz".into(), dirname.into()])?
//!     .check_call(std::iter::empty::<Vec<u8>>())?;
//! # Ok(())
//! # }
//! ```
//!
//! Stop reading early; the child and the writer thread are cleaned up when
//! the stream is dropped:
//!
//! ```no_run
//! # use cmdpipe::Cmd;
//! # fn dummy() -> Result<(), cmdpipe::PipeError> {
//! let _first = Cmd::new("gunzip", [])?
//!     .stream(std::iter::repeat_with(|| vec![0u8; 4096]))?
//!     .next();
//! # Ok(())
//! # }
//! ```

mod cmd;
mod error;
mod pipe;
mod spawn;
mod status;
mod template;
mod text;

pub use cmd::{Cmd, Stderr};
pub use error::PipeError;
pub use pipe::ByteStream;
pub use status::ExitStatus;
pub use template::{Arg, format_cmd, quote};
pub use text::{LineStream, TextStream};

#[cfg(test)]
mod tests;
