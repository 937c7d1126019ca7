//! Incremental parsing of SSE `data:` frames.

/// Reassembles `data:` payloads from a byte stream that may split
/// frames at arbitrary chunk boundaries.
///
/// Only single-line data frames are produced by the backend, so
/// parsing is line based. Keep-alive comments and blank separator
/// lines carry no payload and are dropped.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    pending: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk, returning every complete payload it finishes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(payload) = line.strip_prefix("data:") {
                let payload = payload.trim_start();
                if !payload.is_empty() && payload != "ping" {
                    payloads.push(payload.to_string());
                }
            }
        }
        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_frames() {
        let mut buffer = FrameBuffer::new();
        let payloads = buffer.push(b"data: {\"done\":true}\n\n");
        assert_eq!(payloads, vec!["{\"done\":true}".to_string()]);
    }

    #[test]
    fn reassembles_across_chunk_boundaries() {
        let mut buffer = FrameBuffer::new();
        assert!(buffer.push(b"data: {\"status\":\"Sol").is_empty());
        assert!(buffer.push(b"ving\",\"progress\":").is_empty());
        let payloads = buffer.push(b"\"1/2\"}\n\ndata: {\"done\"");
        assert_eq!(
            payloads,
            vec!["{\"status\":\"Solving\",\"progress\":\"1/2\"}".to_string()]
        );
        let rest = buffer.push(b":true}\n\n");
        assert_eq!(rest, vec!["{\"done\":true}".to_string()]);
    }

    #[test]
    fn skips_keepalive_and_comment_lines() {
        let mut buffer = FrameBuffer::new();
        let payloads = buffer.push(b": comment\n\ndata: ping\n\ndata: {\"done\":true}\n\n");
        assert_eq!(payloads, vec!["{\"done\":true}".to_string()]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let mut buffer = FrameBuffer::new();
        let payloads = buffer.push(b"data: {\"done\":true}\r\n\r\n");
        assert_eq!(payloads, vec!["{\"done\":true}".to_string()]);
    }
}
