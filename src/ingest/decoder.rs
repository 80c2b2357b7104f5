//! UTF-8 Stream Decoding
//!
//! Incremental decoding of chunked byte streams into text.

/// Streaming UTF-8 decoder
///
/// Multi-byte sequences split across chunk boundaries are held back until the rest
/// arrives. Bytes that can never form valid UTF-8 decode to U+FFFD, and a leading
/// byte order mark is dropped.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    started: bool,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning all text that is complete so far
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(error) => {
                    let valid_up_to = error.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));

                    match error.error_len() {
                        // incomplete sequence at the end: wait for more bytes
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + invalid_len);
                        }
                    }
                }
            }
        }

        if !self.started && !out.is_empty() {
            self.started = true;
            if let Some(stripped) = out.strip_prefix('\u{FEFF}') {
                return stripped.to_string();
            }
        }

        out
    }

    /// Number of bytes held back awaiting the rest of a sequence
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"hello\n"), "hello\n");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_split_multibyte_is_buffered() {
        let bytes = "héllo €".as_bytes();
        // 'é' is 2 bytes starting at index 1; split inside it
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(&bytes[..2]), "h");
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.decode(&bytes[2..]), "éllo €");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn test_four_byte_sequence_one_byte_at_a_time() {
        let bytes = "🦀".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        for b in bytes {
            out.push_str(&decoder.decode(std::slice::from_ref(b)));
        }
        assert_eq!(out, "🦀");
    }

    #[test]
    fn test_invalid_bytes_become_replacement() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
        // lone continuation byte
        assert_eq!(decoder.decode(b"\x80c"), "\u{FFFD}c");
    }

    #[test]
    fn test_leading_bom_is_stripped_once() {
        let mut decoder = Utf8StreamDecoder::new();
        // BOM split across chunks
        assert_eq!(decoder.decode(b"\xEF\xBB"), "");
        assert_eq!(decoder.decode(b"\xBFdata"), "data");
        assert_eq!(decoder.decode("\u{FEFF}x".as_bytes()), "\u{FEFF}x");
    }
}
