//! Asynchronous IRC line reading.
//!
//! tokio's `AsyncBufReadExt::read_line` has no limit on line length and fails late on invalid
//! UTF-8.  `IrcReader` reads one line at a time, bounded, and checks it before handing it out.

use std::io;
use tokio::io::{AsyncBufReadExt as _, AsyncRead, AsyncReadExt as _, BufReader};

const UTF8_ERR: &str = "line is not valid UTF-8";
const TOO_LONG_ERR: &str = "line is too long";

/// Asynchronous IRC line reader.
pub struct IrcReader<R> {
    inner: BufReader<R>,

    /// Maximum length of a line, line ending excluded.
    message_max: usize,

    /// Raw bytes of the line being read.
    bytes: Vec<u8>,
}

impl<R> IrcReader<R>
    where R: AsyncRead + Unpin
{
    /// Creates a new `IrcReader` with the given maximum length for lines, in bytes, not counting
    /// the trailing "\r\n".
    pub fn new(r: R, message_max: usize) -> Self {
        Self {
            inner: BufReader::new(r),
            message_max,
            bytes: Vec::new(),
        }
    }

    /// Reads the next line, without its line ending.
    ///
    /// Returns `Ok(None)` at the end of the stream and on empty lines: both mean the client is
    /// done.  Lines that are too long or not UTF-8 are errors of kind `InvalidData`.
    pub async fn read_message(&mut self) -> io::Result<Option<String>> {
        let limit = self.message_max as u64 + 2;
        self.bytes.clear();

        let n = (&mut self.inner).take(limit).read_until(b'\n', &mut self.bytes).await?;
        if n == 0 {
            return Ok(None);
        }
        if self.bytes.last() != Some(&b'\n') && n as u64 == limit {
            return Err(io::Error::new(io::ErrorKind::InvalidData, TOO_LONG_ERR));
        }

        let line = std::str::from_utf8(&self.bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, UTF8_ERR))?
            .trim_end_matches(|c| c == '\r' || c == '\n');
        if line.is_empty() {
            return Ok(None);
        }
        if line.len() > self.message_max {
            return Err(io::Error::new(io::ErrorKind::InvalidData, TOO_LONG_ERR));
        }

        Ok(Some(line.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(input: &[u8], message_max: usize) -> Vec<io::Result<Option<String>>> {
        let mut reader = IrcReader::new(input, message_max);
        let mut res = Vec::new();
        loop {
            let line = reader.read_message().await;
            let done = !matches!(line, Ok(Some(_)));
            res.push(line);
            if done {
                return res;
            }
        }
    }

    fn ok_lines(res: &[io::Result<Option<String>>]) -> Vec<&str> {
        res.iter()
            .filter_map(|line| line.as_ref().ok().and_then(Option::as_deref))
            .collect()
    }

    #[tokio::test]
    async fn test_line_endings() {
        let res = read_all(b"NICK bob\r\nUSER u h s :r\nPING a\r", 512).await;
        assert_eq!(ok_lines(&res), vec!["NICK bob", "USER u h s :r", "PING a"]);
        assert!(matches!(res.last(), Some(Ok(None))));
    }

    #[tokio::test]
    async fn test_empty_line_ends_input() {
        let res = read_all(b"NICK bob\r\n\r\nPING a\r\n", 512).await;
        assert_eq!(ok_lines(&res), vec!["NICK bob"]);
        assert!(matches!(res.last(), Some(Ok(None))));
    }

    #[tokio::test]
    async fn test_end_of_stream() {
        let res = read_all(b"", 512).await;
        assert_eq!(res.len(), 1);
        assert!(matches!(res[0], Ok(None)));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let res = read_all(b"PING a\r\nNICK \xff\xfe\r\n", 512).await;
        assert_eq!(ok_lines(&res), vec!["PING a"]);
        match res.last() {
            Some(Err(err)) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected an error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_line_length() {
        let res = read_all(b"PING 0123\r\nPING 012345\r\n", 9).await;
        assert_eq!(ok_lines(&res), vec!["PING 0123"]);
        match res.last() {
            Some(Err(err)) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
            other => panic!("expected an error, got {:?}", other),
        }

        let res = read_all(b"PING 01234567890123456789", 9).await;
        assert!(ok_lines(&res).is_empty());
        assert!(matches!(res.last(), Some(Err(_))));
    }
}
