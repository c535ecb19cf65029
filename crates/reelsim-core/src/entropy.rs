//! ChaCha20 keystream entropy source
//!
//! The cipher is used purely as a deterministic expansion function: a
//! 256-bit key, a 64-bit nonce (ChaCha stream id) and a 32-bit block counter
//! select a position in the keystream, and the bytes found there are the
//! randomness. No plaintext is ever encrypted.
//!
//! Counter policy: every call to [`EntropySource::generate`] starts at the
//! current block counter and advances it by the number of 64-byte blocks it
//! touched. Tail bytes of a partially used block are discarded, so two calls
//! never read overlapping keystream. Blocks `0..=u32::MAX` are all usable;
//! once block `u32::MAX` has been read the counter sits at 2^32 and every
//! further call fails with `CounterExhausted`.

use std::fmt;

use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng, TryRngCore};
use rand_chacha::ChaCha20Rng;

use crate::error::EntropyError;

/// ChaCha block size in bytes
pub const BLOCK_LEN: usize = 64;

const WORDS_PER_BLOCK: u128 = (BLOCK_LEN / 4) as u128;

/// One past the last usable block
const COUNTER_END: u64 = 1 << 32;

/// Size of the integer domain raw entropy words are drawn from (2^32)
pub const U32_DOMAIN: f64 = 4_294_967_296.0;

/// Result type for entropy operations
pub type EntropyResult<T> = Result<T, EntropyError>;

/// Key material for one keystream
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct StreamKey {
    pub key: [u8; 32],
    pub nonce: u64,
}

impl StreamKey {
    /// Fresh key and nonce from the operating system. Fails rather than
    /// falling back to a weaker source.
    pub fn from_os() -> EntropyResult<Self> {
        let mut key = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut key)
            .map_err(|e| EntropyError::Unavailable(e.to_string()))?;
        let nonce = OsRng
            .try_next_u64()
            .map_err(|e| EntropyError::Unavailable(e.to_string()))?;
        Ok(Self { key, nonce })
    }

    /// Reproducible key and nonce expanded from a 64-bit seed
    pub fn from_seed(seed: u64) -> Self {
        let mut expander = ChaCha20Rng::seed_from_u64(seed);
        let mut key = [0u8; 32];
        expander.fill_bytes(&mut key);
        let nonce = expander.next_u64();
        Self { key, nonce }
    }
}

impl fmt::Debug for StreamKey {
    // Key bytes stay out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamKey")
            .field("key", &"<redacted>")
            .field("nonce", &self.nonce)
            .finish()
    }
}

fn cipher_at(key: &[u8; 32], nonce: u64, counter: u32) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::from_seed(*key);
    rng.set_stream(nonce);
    rng.set_word_pos(counter as u128 * WORDS_PER_BLOCK);
    rng
}

/// Number of keystream blocks needed for `len` bytes
pub fn blocks_for(len: usize) -> u64 {
    len.div_ceil(BLOCK_LEN) as u64
}

/// Stateless keystream: `len` bytes starting at block `counter`.
///
/// Identical (key, nonce, counter, len) always yields identical bytes.
pub fn keystream(key: &[u8; 32], nonce: u64, counter: u32, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    cipher_at(key, nonce, counter).fill_bytes(&mut out);
    out
}

/// Per-owner keystream state: key + nonce + monotonically advancing counter.
///
/// Not `Clone`: a stream is owned by exactly one spin loop.
pub struct EntropySource {
    key: [u8; 32],
    nonce: u64,
    counter: u64,
    cipher: ChaCha20Rng,
    scratch: Vec<u8>,
}

impl EntropySource {
    /// Stream positioned at block `counter`
    pub fn new(stream: StreamKey, counter: u32) -> Self {
        Self {
            key: stream.key,
            nonce: stream.nonce,
            counter: counter as u64,
            cipher: cipher_at(&stream.key, stream.nonce, counter),
            scratch: Vec::new(),
        }
    }

    /// Session stream keyed from OS entropy
    pub fn from_os() -> EntropyResult<Self> {
        Ok(Self::new(StreamKey::from_os()?, 0))
    }

    /// Reproducible stream for tests and seeded simulations
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StreamKey::from_seed(seed), 0)
    }

    /// Current block counter (next block to be consumed); 2^32 once the
    /// stream is used up
    pub fn counter(&self) -> u64 {
        self.counter
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Move to another nonce/counter under the same key
    pub fn seek(&mut self, nonce: u64, counter: u32) {
        self.nonce = nonce;
        self.counter = counter as u64;
        self.cipher.set_stream(nonce);
        self.cipher.set_word_pos(counter as u128 * WORDS_PER_BLOCK);
    }

    fn advance(&mut self, len: usize) -> EntropyResult<()> {
        let blocks = blocks_for(len);
        let next = self.counter + blocks;
        if next > COUNTER_END {
            return Err(EntropyError::CounterExhausted {
                counter: self.counter,
                blocks,
            });
        }
        self.counter = next;
        Ok(())
    }

    /// Fill `buf` with fresh keystream bytes
    pub fn fill(&mut self, buf: &mut [u8]) -> EntropyResult<()> {
        let start = self.counter;
        self.advance(buf.len())?;
        self.cipher.set_word_pos(start as u128 * WORDS_PER_BLOCK);
        self.cipher.fill_bytes(buf);
        Ok(())
    }

    /// `n` fresh keystream bytes
    pub fn generate(&mut self, n: usize) -> EntropyResult<Vec<u8>> {
        let mut out = vec![0u8; n];
        self.fill(&mut out)?;
        Ok(out)
    }

    /// Fill `out` with little-endian u32 words drawn from one call
    pub fn fill_u32(&mut self, out: &mut [u32]) -> EntropyResult<()> {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.resize(out.len() * 4, 0);
        let filled = self.fill(&mut scratch);
        if filled.is_ok() {
            for (word, chunk) in out.iter_mut().zip(scratch.chunks_exact(4)) {
                *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
        }
        self.scratch = scratch;
        filled
    }

    /// One fresh little-endian u32
    pub fn next_u32(&mut self) -> EntropyResult<u32> {
        let mut word = [0u32; 1];
        self.fill_u32(&mut word)?;
        Ok(word[0])
    }

    /// Uniform value in [0, 1)
    pub fn uniform(&mut self) -> EntropyResult<f64> {
        Ok(self.next_u32()? as f64 / U32_DOMAIN)
    }

    /// Integer in `min..=max` as `min + word % span`
    pub fn random_in_range(&mut self, min: u32, max: u32) -> EntropyResult<u32> {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = (hi - lo) as u64 + 1;
        let word = self.next_u32()? as u64;
        Ok(lo + (word % span) as u32)
    }
}

impl fmt::Debug for EntropySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntropySource")
            .field("nonce", &self.nonce)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}
