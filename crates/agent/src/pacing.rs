//! Paced reveal of an already-complete answer.
//!
//! Buffered answers are broken into small word groups and emitted with a
//! base delay plus random jitter, so the streaming surface reads the same
//! whether the text came from a buffered run or a genuine token stream.

use rand::Rng;
use std::time::Duration;

/// Words per emitted chunk.
const WORDS_PER_CHUNK: usize = 4;

pub struct Pacer {
    base_delay_ms: u64,
    jitter_ms: u64,
}

impl Pacer {
    pub fn new(base_delay_ms: u64, jitter_ms: u64) -> Self {
        Self {
            base_delay_ms,
            jitter_ms,
        }
    }

    /// Split `text` into chunks whose concatenation is exactly `text`.
    pub fn chunks(text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut words = 0;

        for piece in text.split_inclusive(' ') {
            current.push_str(piece);
            words += 1;
            if words == WORDS_PER_CHUNK {
                chunks.push(std::mem::take(&mut current));
                words = 0;
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Sleep the base delay plus jitter.
    pub async fn pause(&self) {
        let jitter = if self.jitter_ms > 0 {
            rand::rng().random_range(0..=self.jitter_ms)
        } else {
            0
        };
        tokio::time::sleep(Duration::from_millis(self.base_delay_ms + jitter)).await;
    }
}
