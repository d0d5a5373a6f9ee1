//! Incremental stream decoding
//!
//! [`FrameDecoder`] is the sans-IO half: it is fed raw byte blocks in
//! whatever sizes the transport delivers them and emits completed text
//! fragments. Both an incomplete trailing line and an incomplete multi-byte
//! UTF-8 sequence are carried over to the next block, so a frame whose bytes
//! straddle two network reads still decodes intact.
//!
//! [`FragmentStream`] is the lazy pull adapter over an HTTP response body:
//! a single forward pass yielding fragments in arrival order, ending at the
//! terminal marker or at end-of-data, whichever comes first.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::error::RelayError;
use crate::frame::{DATA_PREFIX, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    Reading,
    Done,
}

/// Incremental frame decoder.
///
/// Owned exclusively by one decode operation; never shared across requests.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecodeState,
    /// Bytes held back because they end mid-character.
    carry: Vec<u8>,
    /// Text held back because it ends mid-line.
    line: String,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::Reading,
            carry: Vec::new(),
            line: String::new(),
        }
    }

    /// True once the terminal marker has been observed. Further input is
    /// ignored from that point on.
    pub fn is_done(&self) -> bool {
        self.state == DecodeState::Done
    }

    /// Feed one byte block, returning the fragments it completed in arrival
    /// order.
    pub fn push(&mut self, block: &[u8]) -> Vec<String> {
        if self.is_done() {
            return Vec::new();
        }
        let text = self.decode_block(block);
        self.line.push_str(&text);

        let mut fragments = Vec::new();
        while let Some(pos) = self.line.find('\n') {
            let rest = self.line.split_off(pos + 1);
            let line = std::mem::replace(&mut self.line, rest);
            if self.apply_line(line.trim_end_matches(['\r', '\n']), &mut fragments) {
                break;
            }
        }
        fragments
    }

    /// Flush at end-of-data. A trailing line without its newline is still
    /// processed; a cleanly closed stream without the terminal marker is
    /// normal completion, not an error.
    pub fn finish(&mut self) -> Vec<String> {
        if self.is_done() {
            return Vec::new();
        }
        if !self.carry.is_empty() {
            let bytes = std::mem::take(&mut self.carry);
            self.line.push_str(&String::from_utf8_lossy(&bytes));
        }

        let mut fragments = Vec::new();
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.apply_line(line.trim_end_matches(['\r', '\n']), &mut fragments);
        }
        self.state = DecodeState::Done;
        fragments
    }

    /// Decode a block to text, retaining any incomplete trailing character
    /// for the next block.
    fn decode_block(&mut self, block: &[u8]) -> String {
        self.carry.extend_from_slice(block);
        let bytes = std::mem::take(&mut self.carry);
        match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_string(),
            Err(err) if err.error_len().is_none() => {
                let valid = err.valid_up_to();
                self.carry = bytes[valid..].to_vec();
                String::from_utf8_lossy(&bytes[..valid]).into_owned()
            }
            // Invalid sequence in the middle of the block; replace and move on
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Process one complete line. Returns true when the terminal marker was
    /// seen and decoding must stop.
    fn apply_line(&mut self, line: &str, fragments: &mut Vec<String>) -> bool {
        match Frame::parse_line(line) {
            Some(Frame::Done) => {
                self.state = DecodeState::Done;
                self.line.clear();
                self.carry.clear();
                true
            }
            Some(Frame::Content(Some(text))) => {
                fragments.push(text);
                false
            }
            // Payload parsed but carried no content field
            Some(Frame::Content(None)) => false,
            None => {
                if line.starts_with(DATA_PREFIX) {
                    tracing::warn!(payload = line, "skipping malformed frame payload");
                }
                false
            }
        }
    }
}

/// Lazy fragment sequence over an HTTP response body.
///
/// Single forward pass, not restartable. Once the terminal marker is
/// observed the underlying body is dropped immediately, so bytes queued
/// after it are never read; dropping the stream mid-iteration releases the
/// body the same way.
pub struct FragmentStream<S> {
    body: Option<S>,
    decoder: FrameDecoder,
    pending: VecDeque<String>,
}

impl<S, B, E> FragmentStream<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    /// Wrap a response body. Fails with [`RelayError::MissingBody`] when the
    /// response has no body at all, before any fragment is produced.
    pub fn new(body: Option<S>) -> Result<Self, RelayError> {
        let body = body.ok_or(RelayError::MissingBody)?;
        Ok(Self {
            body: Some(body),
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
        })
    }
}

impl<S, B, E> Stream for FragmentStream<S>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    type Item = Result<String, RelayError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(fragment) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(fragment)));
            }
            let Some(body) = this.body.as_mut() else {
                return Poll::Ready(None);
            };
            match Pin::new(body).poll_next(cx) {
                Poll::Ready(Some(Ok(block))) => {
                    this.pending.extend(this.decoder.push(block.as_ref()));
                    if this.decoder.is_done() {
                        this.body = None;
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    this.body = None;
                    return Poll::Ready(Some(Err(RelayError::Transport(err.to_string()))));
                }
                Poll::Ready(None) => {
                    this.pending.extend(this.decoder.finish());
                    this.body = None;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
