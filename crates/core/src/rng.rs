use serde::{Deserialize, Serialize};
use thiserror::Error;

const MODULUS: u64 = 0x8000_0000;
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RngError {
    #[error("invalid range: max {max} < min {min}")]
    InvalidRange { min: i64, max: i64 },
}

/// Serialized form of a generator: the original seed string and the 31-bit state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngSnapshot {
    pub seed: String,
    #[serde(alias = "value")]
    pub state: u32,
}

/// Linear congruential generator over a 31-bit state, seeded from a string.
///
/// Cloning yields an independent generator with identical future output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngState {
    seed: String,
    state: u64,
}

impl RngState {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            state: hash_seed(seed),
        }
    }

    pub fn from_snapshot(snapshot: &RngSnapshot) -> Self {
        Self {
            seed: snapshot.seed.clone(),
            state: u64::from(snapshot.state) % MODULUS,
        }
    }

    pub fn snapshot(&self) -> RngSnapshot {
        RngSnapshot {
            seed: self.seed.clone(),
            state: self.state as u32,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Advances the state and returns a float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (MULTIPLIER * self.state + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    pub fn float(&mut self) -> f64 {
        self.next_f64()
    }

    /// Inclusive integer in `[min, max]`.
    pub fn int(&mut self, min: i64, max: i64) -> Result<i64, RngError> {
        if max < min {
            return Err(RngError::InvalidRange { min, max });
        }
        let span = (max - min + 1) as f64;
        Ok((self.next_f64() * span).floor() as i64 + min)
    }

    /// Index in `[0, len)`; same draw as `int(0, len - 1)`.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let pick = (self.next_f64() * len as f64).floor() as usize;
        pick.min(len - 1)
    }

    /// Fisher-Yates from the back, drawing `int(0, i)` at each step.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// FNV-1a style hash over UTF-16 code units, folded to 31 bits.
fn hash_seed(seed: &str) -> u64 {
    let mut h: u32 = 2_166_136_261;
    for unit in seed.encode_utf16() {
        h ^= u32::from(unit);
        h = h
            .wrapping_add(h << 1)
            .wrapping_add(h << 4)
            .wrapping_add(h << 7)
            .wrapping_add(h << 8)
            .wrapping_add(h << 24);
    }
    u64::from(h) % MODULUS
}
