//! Standard stream sinks.

use std::io::{self, Write};

use crate::sink::{LogSink, SinkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes each record to stdout or stderr under the stream lock, so lines
/// from concurrent requests never interleave.
#[derive(Debug, Clone, Copy)]
pub struct StreamSink {
    stream: Stream,
}

impl StreamSink {
    pub fn stdout() -> Self {
        Self { stream: Stream::Stdout }
    }

    pub fn stderr() -> Self {
        Self { stream: Stream::Stderr }
    }
}

fn write_locked(mut out: impl Write, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()
}

impl LogSink for StreamSink {
    fn write_line(&self, line: &str) -> Result<(), SinkError> {
        match self.stream {
            Stream::Stdout => write_locked(io::stdout().lock(), line)?,
            Stream::Stderr => write_locked(io::stderr().lock(), line)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_locked_appends_newline() {
        let mut buf = Vec::new();
        write_locked(&mut buf, "{\"k\":\"ü\"}").unwrap();
        assert_eq!(buf, "{\"k\":\"ü\"}\n".as_bytes());
    }
}
