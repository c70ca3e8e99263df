#[cfg(unix)]
use std::io;
#[cfg(unix)]
use std::path::Path;

#[cfg(unix)]
use tokio::net::unix::pipe;
#[cfg(unix)]
use tokio::sync::mpsc::UnboundedSender;

/// Accumulates raw bytes from the pipe and hands out complete lines.
///
/// Bytes after the last newline stay buffered until the rest of the line
/// arrives. Lines are decoded lossily, so a writer sending invalid UTF-8
/// can't wedge the channel.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete line, with trailing `\r` and `\n` stripped.
    /// Returns `None` while only an unterminated tail (or nothing) remains.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.buf.drain(..=pos).collect();
        let line = String::from_utf8_lossy(&raw);
        Some(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Non-blocking reader for the command FIFO.
///
/// The pipe is opened read-write, not read-only: with a read-only descriptor
/// the kernel reports EOF every time the last writer disconnects, forcing a
/// reopen cycle. Holding a write end ourselves keeps the pipe open, so reads
/// simply return "no data yet" instead.
#[cfg(unix)]
pub struct FifoReader {
    receiver: pipe::Receiver,
    buffer: LineBuffer,
}

#[cfg(unix)]
impl FifoReader {
    /// Open `path` in read-write, non-blocking mode and register it with the
    /// runtime's readiness machinery.
    pub fn open(path: &Path) -> io::Result<Self> {
        let receiver = pipe::OpenOptions::new()
            .read_write(true)
            .open_receiver(path)?;
        Ok(Self {
            receiver,
            buffer: LineBuffer::default(),
        })
    }

    /// Wait until the pipe has data available to read.
    pub async fn readable(&self) -> io::Result<()> {
        self.receiver.readable().await
    }

    /// One atomic drain pass: read everything currently available, then emit
    /// every complete buffered line in arrival order. An empty pipe yields
    /// zero lines and is not an error. Returns the number of lines emitted.
    pub fn drain(&mut self, lines: &UnboundedSender<String>) -> io::Result<usize> {
        let mut chunk = [0u8; 4096];
        loop {
            match self.receiver.try_read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => self.buffer.extend(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(e),
            }
        }

        let mut emitted = 0;
        while let Some(line) = self.buffer.next_line() {
            // Empty lines are still commands; no filtering at this layer
            let _ = lines.send(line);
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Final drain before shutdown, flushing lines that arrived but were not
    /// yet delivered. Consumes the reader, so the descriptor is released
    /// exactly once and no reads can happen afterwards.
    pub fn cleanup(mut self, lines: &UnboundedSender<String>) {
        let _ = self.drain(lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(buffer: &mut LineBuffer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = buffer.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn complete_lines_come_out_in_order() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"reload\nscroll down\r\n");

        assert_eq!(lines_of(&mut buffer), vec!["reload", "scroll down"]);
    }

    #[test]
    fn partial_tail_stays_buffered() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"one\ntwo\nthree-but-unfini");

        assert_eq!(lines_of(&mut buffer), vec!["one", "two"]);

        buffer.extend(b"shed\n");
        assert_eq!(lines_of(&mut buffer), vec!["three-but-unfinished"]);
    }

    #[test]
    fn bare_newline_is_an_empty_line() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"\n");

        assert_eq!(lines_of(&mut buffer), vec![""]);
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"open example.org\r\n");

        assert_eq!(lines_of(&mut buffer), vec!["open example.org"]);
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        let mut buffer = LineBuffer::default();
        assert_eq!(buffer.next_line(), None);
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"rel\xffoad\n");

        let lines = lines_of(&mut buffer);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("rel"));
        assert!(lines[0].ends_with("oad"));
    }

    #[test]
    fn interior_carriage_returns_are_preserved() {
        let mut buffer = LineBuffer::default();
        buffer.extend(b"a\rb\n");

        assert_eq!(lines_of(&mut buffer), vec!["a\rb"]);
    }
}
