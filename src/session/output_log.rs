//! Rolling log of raw PTY output.
//!
//! Used only for reads; screenshots come from the terminal buffer. Chunks
//! are stored as text, so a multi-byte character split across two reads is
//! held back until its remaining bytes arrive.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Number of chunks kept before the oldest is evicted.
pub const MAX_CHUNKS: usize = 1000;

#[derive(Debug, Default)]
struct Inner {
    chunks: VecDeque<String>,
    /// Bytes of an incomplete trailing UTF-8 sequence
    carry: Vec<u8>,
}

/// Bounded, thread-safe chunk log.
#[derive(Debug)]
pub struct OutputLog {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl Default for OutputLog {
    fn default() -> Self {
        Self::with_capacity(MAX_CHUNKS)
    }
}

impl OutputLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append one raw chunk, evicting the oldest when full.
    pub fn push(&self, bytes: &[u8]) {
        let mut inner = self.lock();
        let mut data = std::mem::take(&mut inner.carry);
        data.extend_from_slice(bytes);

        let split = incomplete_tail_start(&data);
        inner.carry = data.split_off(split);
        if data.is_empty() {
            return;
        }

        inner.chunks.push_back(String::from_utf8_lossy(&data).into_owned());
        while inner.chunks.len() > self.capacity {
            inner.chunks.pop_front();
        }
    }

    /// Every retained chunk, concatenated.
    pub fn contents(&self) -> String {
        let inner = self.lock();
        inner.chunks.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Index where a trailing, not yet complete UTF-8 sequence starts, or
/// `bytes.len()` if the data ends on a character boundary.
fn incomplete_tail_start(bytes: &[u8]) -> usize {
    let len = bytes.len();
    // A sequence is at most 4 bytes, so only the last 3 can be incomplete
    for back in 1..=len.min(3) {
        let i = len - back;
        let b = bytes[i];
        if b & 0b1100_0000 == 0b1000_0000 {
            // Continuation byte, keep looking for the lead
            continue;
        }
        let needed = match b {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if back < needed { i } else { len };
    }
    len
}
