use std::fmt;

use crate::error::PipeError;
use crate::pipe::ByteStream;
use crate::status::ExitStatus;

/// The output of a running command, decoded to text.
///
/// Created by [`Cmd::stream_text`]. Wraps a [`ByteStream`] and decodes it as
/// UTF-8 incrementally: a multi-byte sequence split across two chunks is
/// carried over to the next pull rather than mangled, and invalid sequences
/// are replaced with the `U+FFFD` replacement character.
///
/// [`Cmd::stream_text`]: crate::Cmd::stream_text
#[must_use]
pub struct TextStream {
    inner: ByteStream,
    carry: Vec<u8>,
}

impl TextStream {
    pub(crate) fn new(inner: ByteStream) -> TextStream {
        TextStream {
            inner,
            carry: Vec::new(),
        }
    }

    /// Returns the command line this stream was started from.
    pub fn cmdline(&self) -> &str {
        self.inner.cmdline()
    }

    /// Returns the exit status, if the child is known to have finished.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.inner.exit_status()
    }

    /// Drains the remaining output, discarding it, and returns the child's
    /// exit status.
    pub fn wait(mut self) -> Result<ExitStatus, PipeError> {
        while let Some(chunk) = self.next() {
            chunk?;
        }
        Ok(self.inner.exit_status().unwrap_or(ExitStatus::Undetermined))
    }
}

impl Iterator for TextStream {
    type Item = Result<String, PipeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next() {
                Some(Ok(chunk)) => {
                    self.carry.extend_from_slice(&chunk);
                    let keep = incomplete_tail_len(&self.carry);
                    if keep == self.carry.len() {
                        // Nothing but the start of a multi-byte sequence so
                        // far; pull more.
                        continue;
                    }
                    let tail = self.carry.split_off(self.carry.len() - keep);
                    let complete = std::mem::replace(&mut self.carry, tail);
                    return Some(Ok(from_utf8_lossy(complete)));
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    if self.carry.is_empty() {
                        return None;
                    }
                    // Whatever is left at EOF can no longer be completed.
                    let rest = std::mem::take(&mut self.carry);
                    return Some(Ok(from_utf8_lossy(rest)));
                }
            }
        }
    }
}

impl fmt::Debug for TextStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextStream")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// The output of a running command, buffered into lines.
///
/// Created by [`Cmd::lines`]. Yields `\n`-terminated lines, terminator
/// included; the final line is yielded without a terminator if the child's
/// output didn't end in one.
///
/// [`Cmd::lines`]: crate::Cmd::lines
#[must_use]
pub struct LineStream {
    inner: TextStream,
    buf: String,
}

impl LineStream {
    pub(crate) fn new(inner: TextStream) -> LineStream {
        LineStream {
            inner,
            buf: String::new(),
        }
    }

    /// Returns the command line this stream was started from.
    pub fn cmdline(&self) -> &str {
        self.inner.cmdline()
    }

    /// Returns the exit status, if the child is known to have finished.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.inner.exit_status()
    }

    /// Drains the remaining output, discarding it, and returns the child's
    /// exit status.
    pub fn wait(mut self) -> Result<ExitStatus, PipeError> {
        while let Some(line) = self.next() {
            line?;
        }
        Ok(self.inner.exit_status().unwrap_or(ExitStatus::Undetermined))
    }
}

impl Iterator for LineStream {
    type Item = Result<String, PipeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pos) = self.buf.find('\n') {
                let rest = self.buf.split_off(pos + 1);
                return Some(Ok(std::mem::replace(&mut self.buf, rest)));
            }
            match self.inner.next() {
                Some(Ok(chunk)) => self.buf.push_str(&chunk),
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    if self.buf.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buf)));
                }
            }
        }
    }
}

impl fmt::Debug for LineStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStream")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

/// Number of trailing bytes that may be the beginning of a UTF-8 sequence
/// whose remainder hasn't arrived yet.
fn incomplete_tail_len(buf: &[u8]) -> usize {
    // A lead byte can be at most 3 positions from the end and still be
    // incomplete.
    for back in 1..=buf.len().min(3) {
        let byte = buf[buf.len() - back];
        let need = match byte {
            0x00..=0x7f => return 0,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            // Continuation (or invalid) byte; keep scanning for the lead.
            _ => continue,
        };
        return if need > back { back } else { 0 };
    }
    0
}

/// Like String::from_utf8_lossy(), but takes `Vec<u8>` and reuses its
/// storage if possible.
fn from_utf8_lossy(v: Vec<u8>) -> String {
    match String::from_utf8(v) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into(),
    }
}
