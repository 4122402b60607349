use std::io::{
    Bytes,
    Read,
};

use anyhow::{
    Result,
    Error,
};
use unicode_reader::CodePoints;

/// Code point reader with arbitrary lookahead, used to scan filter expressions
/// without assuming anything about their whitespace.
pub struct PeekableCodePoints<R>
    where R: Read
{
    codepoints: CodePoints<Bytes<R>>,
    buffer: Vec<char>,
}

impl<R: Read> PeekableCodePoints<R> {
    pub fn new(reader: R) -> Self {
        PeekableCodePoints {
            codepoints: CodePoints::from(reader),
            buffer: Vec::new(),
        }
    }

    fn feed_buffer(&mut self, count: usize) -> Result<usize> {
        for i in 0..count {
            let item = self.codepoints.next();
            match item {
                None => return Ok(i),
                Some(Err(e)) => return Err(Error::new(e)),
                Some(Ok(c)) => self.buffer.push(c),
            }
        }

        Ok(count)
    }

    fn ensure_buffered(&mut self, count: usize) -> Result<usize> {
        if count > self.buffer.len() {
            self.feed_buffer(count - self.buffer.len())?;
        }

        Ok(count.min(self.buffer.len()))
    }

    pub fn peek(&mut self, count: usize) -> Result<String> {
        let available = self.ensure_buffered(count)?;
        Ok(self.buffer[..available].iter().collect())
    }

    pub fn peek_char(&mut self, index: usize) -> Result<Option<char>> {
        self.ensure_buffered(index + 1)?;
        Ok(self.buffer.get(index).copied())
    }

    pub fn skip(&mut self, count: usize) -> Result<usize> {
        let available = self.ensure_buffered(count)?;
        self.buffer.drain(0..available);

        Ok(available)
    }
}

#[cfg(test)]
mod peekable_codepoints_tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() -> Result<()> {
        let mut cp = PeekableCodePoints::new("a AND b".as_bytes());
        assert_eq!(cp.peek(3)?, "a A");
        assert_eq!(cp.peek_char(2)?, Some('A'));
        assert_eq!(cp.skip(2)?, 2);
        assert_eq!(cp.peek(3)?, "AND");
        Ok(())
    }

    #[test]
    fn test_past_end() -> Result<()> {
        let mut cp = PeekableCodePoints::new("é=1".as_bytes());
        assert_eq!(cp.peek(10)?, "é=1");
        assert_eq!(cp.peek_char(3)?, None);
        assert_eq!(cp.skip(10)?, 3);
        assert_eq!(cp.peek_char(0)?, None);
        Ok(())
    }
}
