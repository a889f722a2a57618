//! Streamed response parsing.
//!
//! The endpoint answers with newline-delimited records, optionally prefixed
//! with `data: `. A record containing the `[DONE]` sentinel ends the stream.
//! Network chunks do not respect line boundaries, so bytes are buffered until
//! a full line is available.

use proofmark_protocols::ProviderError;

use crate::api::StreamFragment;

const DATA_PREFIX: &str = "data: ";
const TERMINATOR: &str = "[DONE]";

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Fragment(String),
    Skip,
    Done,
}

fn parse_line(raw: &str) -> Result<Line, ProviderError> {
    let line = raw.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Ok(Line::Skip);
    }
    if line.contains(TERMINATOR) {
        return Ok(Line::Done);
    }

    let data = line.strip_prefix(DATA_PREFIX).unwrap_or(line);
    let fragment: StreamFragment =
        serde_json::from_str(data).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let text = fragment.text();
    if text.is_empty() {
        Ok(Line::Skip)
    } else {
        Ok(Line::Fragment(text.to_string()))
    }
}

/// Concatenates fragment payloads in arrival order until the terminator.
#[derive(Debug, Default)]
pub struct StreamAssembler {
    buffer: Vec<u8>,
    output: String,
    fragments: usize,
    finished: bool,
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminator has been seen. Later bytes are ignored.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one network chunk.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), ProviderError> {
        if self.finished {
            return Ok(());
        }
        self.buffer.extend_from_slice(bytes);

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.consume(&line[..line.len() - 1])?;
            if self.finished {
                self.buffer.clear();
                break;
            }
        }
        Ok(())
    }

    /// Flush the trailing partial line and return the assembled text.
    pub fn finish(mut self) -> Result<String, ProviderError> {
        if !self.finished && !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            self.consume(&rest)?;
        }
        if self.fragments == 0 {
            return Err(ProviderError::Malformed(
                "response contained no correction".to_string(),
            ));
        }
        if !self.finished {
            tracing::debug!("Correction stream ended without terminator");
        }
        Ok(self.output)
    }

    fn consume(&mut self, line: &[u8]) -> Result<(), ProviderError> {
        let line = std::str::from_utf8(line)
            .map_err(|e| ProviderError::Malformed(format!("invalid UTF-8: {}", e)))?;
        match parse_line(line)? {
            Line::Fragment(text) => {
                self.output.push_str(&text);
                self.fragments += 1;
            }
            Line::Skip => {}
            Line::Done => self.finished = true,
        }
        Ok(())
    }
}
