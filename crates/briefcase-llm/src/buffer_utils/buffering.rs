use anyhow::Result;
use std::collections::VecDeque;

/// Byte buffer that yields complete lines as upstream chunks arrive.
/// Chunks may split a line (or a UTF-8 sequence) anywhere.
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Next complete line with the terminator (`\n` or `\r\n`) removed.
    /// `None` until a newline has been received.
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        Some(decode_line(&line_bytes))
    }

    /// Drain whatever is left once the upstream has closed.
    pub fn take_remainder(&mut self) -> Option<Result<String>> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest: Vec<u8> = self.buffer.drain(..).collect();
        Some(decode_line(&rest))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn decode_line(bytes: &[u8]) -> Result<String> {
    let line = std::str::from_utf8(bytes)
        .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in stream line: {}", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut buffer = CircularLineBuffer::with_capacity(64);

        buffer.extend(b"data: {\"a\"");
        assert!(buffer.next_line().is_none());

        buffer.extend(b":1}\r\ndata: [DONE]\n");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: {\"a\":1}");
        assert_eq!(buffer.next_line().unwrap().unwrap(), "data: [DONE]");
        assert!(buffer.next_line().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_multibyte_char_split() {
        let mut buffer = CircularLineBuffer::with_capacity(16);
        let text = "é\n".as_bytes();

        buffer.extend(&text[..1]);
        assert!(buffer.next_line().is_none());
        buffer.extend(&text[1..]);
        assert_eq!(buffer.next_line().unwrap().unwrap(), "é");
    }

    #[test]
    fn test_take_remainder() {
        let mut buffer = CircularLineBuffer::with_capacity(16);
        buffer.extend(b"tail without newline");

        assert!(buffer.next_line().is_none());
        assert_eq!(buffer.take_remainder().unwrap().unwrap(), "tail without newline");
        assert!(buffer.take_remainder().is_none());
    }
}
