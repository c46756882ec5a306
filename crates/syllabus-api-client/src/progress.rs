//! Upload progress tracking.
//!
//! File parts are streamed to the transport in fixed-size chunks. Each chunk
//! pulled by the transport reports its length over a channel, and
//! `UploadProgress` turns the running byte count into a percentage.

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;

/// Chunk size for streamed file parts.
pub const CHUNK_SIZE: usize = 64 * 1024;

pub type ProgressSender = mpsc::UnboundedSender<u64>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<u64>;

/// Percent-complete tracker for one submission.
///
/// Reported values are clamped to `[0, 100]` and never decrease. With an
/// unknown (zero) total the percentage stays where it was.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    total: u64,
    sent: u64,
    percent: u8,
}

impl UploadProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            sent: 0,
            percent: 0,
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Record `bytes` more sent. Returns the new percentage if it changed.
    pub fn record(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes);
        if self.total == 0 {
            return None;
        }
        let rounded = (self.sent as u128 * 100 + self.total as u128 / 2) / self.total as u128;
        self.bump(rounded.min(100) as u8)
    }

    /// The body has been fully transmitted. Returns 100 unless already there.
    pub fn complete(&mut self) -> Option<u8> {
        self.bump(100)
    }

    fn bump(&mut self, percent: u8) -> Option<u8> {
        if percent > self.percent {
            self.percent = percent;
            Some(percent)
        } else {
            None
        }
    }
}

/// Stream `bytes` in chunks, reporting each chunk's length as it is pulled.
pub fn reporting_stream(
    bytes: Bytes,
    progress: ProgressSender,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let chunks: Vec<Bytes> = (0..bytes.len())
        .step_by(CHUNK_SIZE)
        .map(|start| bytes.slice(start..(start + CHUNK_SIZE).min(bytes.len())))
        .collect();

    futures::stream::iter(chunks.into_iter().map(move |chunk| {
        // The receiver is gone once the submission stopped listening.
        let _ = progress.send(chunk.len() as u64);
        Ok(chunk)
    }))
}
