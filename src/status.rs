use std::fmt;
use std::process;

/// Exit status of a process.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum ExitStatus {
    /// The process exited with the specified exit code.
    ///
    /// Note that the exit code is limited to a much smaller range on most
    /// platforms.
    Exited(u32),

    /// The process exited due to a signal with the specified number.
    ///
    /// This variant is never created on Windows, where signals of Unix kind
    /// do not exist.
    Signaled(u8),

    /// It is known that the process has completed, but its exit status is
    /// unavailable.
    ///
    /// This should not occur in normal operation.
    Undetermined,
}

impl ExitStatus {
    /// True if the exit status of the process is 0.
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    /// Returns the exit code if the process exited normally.
    pub fn code(&self) -> Option<u32> {
        match self {
            ExitStatus::Exited(code) => Some(*code),
            _ => None,
        }
    }

    /// Returns the signal number if the process was killed by a signal.
    ///
    /// Always returns `None` on Windows.
    pub fn signal(&self) -> Option<u8> {
        match self {
            ExitStatus::Signaled(sig) => Some(*sig),
            _ => None,
        }
    }

    pub(crate) fn from_std(status: process::ExitStatus) -> ExitStatus {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(sig) = status.signal() {
                return ExitStatus::Signaled(sig as u8);
            }
        }
        match status.code() {
            Some(code) => ExitStatus::Exited(code as u32),
            None => ExitStatus::Undetermined,
        }
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit code {}", code),
            ExitStatus::Signaled(sig) => write!(f, "signal {}", sig),
            ExitStatus::Undetermined => write!(f, "undetermined exit status"),
        }
    }
}
