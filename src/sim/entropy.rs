//! Cheap per-tick randomness
//!
//! Random number generation dominates the cost of a tick at grid scale, so
//! only a small batch of words is drawn per tick. Each cell is mapped to one
//! batch slot by a fixed shuffled bucket table, and a cell's word is reused
//! for several small-range draws by dropping its lowest decimal digit after
//! each use. Successive draws from one word are therefore correlated; that is
//! an accepted approximation. `EntropyMode::Fresh` draws a new word per use.
//!
//! Cells are visited in a fixed shuffled order so movement has no directional
//! bias from grid order.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{RAND_BATCH_SIZE, XORSHIFT_SEED_MAX, XORSHIFT_SEED_MIN};

/// How cells obtain their random values within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntropyMode {
    /// Shared batch words with decimal digit reuse
    #[default]
    Batched,
    /// A fresh generator word for every draw
    Fresh,
}

/// 128-bit xorshift generator (four 32-bit words)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift128 {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
}

impl Xorshift128 {
    /// State words must not all be zero
    pub fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        debug_assert!(a | b | c | d != 0);
        Self { a, b, c, d }
    }

    /// Seed all four words from another generator
    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let mut word = || rng.random_range(XORSHIFT_SEED_MIN..=XORSHIFT_SEED_MAX);
        Self::new(word(), word(), word(), word())
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut t = self.d;
        let s = self.a;

        self.d = self.c;
        self.c = self.b;
        self.b = s;

        t ^= t << 11;
        t ^= t >> 8;
        self.a = t ^ s ^ (s >> 19);
        self.a
    }
}

/// Reuses one random word for many small-range draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitExtractor {
    word: u32,
}

impl DigitExtractor {
    pub fn new(word: u32) -> Self {
        Self { word }
    }

    /// Value in `[min, max]`. Consumes one decimal digit unless `min == max`.
    #[inline]
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let value = min + self.word % (max - min + 1);
        self.word /= 10;
        value
    }
}

/// Random source handed to one cell for one tick
#[derive(Debug)]
pub enum CellRandom<'a> {
    Batched(DigitExtractor),
    Fresh(&'a mut Xorshift128),
}

impl CellRandom<'_> {
    /// Value in `[min, max]`; returns `min` without drawing when the range is
    /// a single value
    #[inline]
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        match self {
            CellRandom::Batched(digits) => digits.range(min, max),
            CellRandom::Fresh(rng) => {
                if min >= max {
                    min
                } else {
                    min + rng.next_u32() % (max - min + 1)
                }
            }
        }
    }
}

/// Per-tick word batch
#[derive(Debug, Clone)]
pub struct RandomStream {
    mode: EntropyMode,
    xorshift: Xorshift128,
    batch: Vec<u32>,
}

impl RandomStream {
    pub fn new(bucket_count: usize, mode: EntropyMode, xorshift: Xorshift128) -> Self {
        Self {
            mode,
            xorshift,
            batch: vec![0; bucket_count],
        }
    }

    pub fn mode(&self) -> EntropyMode {
        self.mode
    }

    /// Draw this tick's words
    pub fn refresh(&mut self) {
        if self.mode == EntropyMode::Batched {
            for word in &mut self.batch {
                *word = self.xorshift.next_u32();
            }
        }
    }

    /// Random source for a cell assigned to `bucket`
    #[inline]
    pub fn cell(&mut self, bucket: usize) -> CellRandom<'_> {
        match self.mode {
            EntropyMode::Batched => CellRandom::Batched(DigitExtractor::new(self.batch[bucket])),
            EntropyMode::Fresh => CellRandom::Fresh(&mut self.xorshift),
        }
    }
}

/// The two fixed permutations: cell visiting order and cell to batch slot
#[derive(Debug, Clone)]
pub struct Noise {
    iteration_order: Vec<u32>,
    rng_bucket: Vec<u16>,
}

impl Noise {
    /// Cells are split into `bucket_count` equal runs before shuffling; any
    /// remainder joins the last bucket.
    pub fn new<R: Rng>(size: usize, bucket_count: usize, rng: &mut R) -> Self {
        let bucket_count = bucket_count.clamp(1, size.max(1));
        let per_bucket = (size / bucket_count).max(1);
        let mut rng_bucket: Vec<u16> = (0..size)
            .map(|i| (i / per_bucket).min(bucket_count - 1) as u16)
            .collect();
        let mut iteration_order: Vec<u32> = (0..size as u32).collect();

        rng_bucket.shuffle(rng);
        iteration_order.shuffle(rng);

        Self {
            iteration_order,
            rng_bucket,
        }
    }

    /// Every cell index exactly once
    #[inline]
    pub fn iteration_order(&self) -> &[u32] {
        &self.iteration_order
    }

    #[inline]
    pub fn bucket(&self, index: usize) -> usize {
        self.rng_bucket[index] as usize
    }
}

/// Entropy artifacts owned by a simulation
#[derive(Debug, Clone)]
pub struct Entropy {
    pub noise: Noise,
    pub stream: RandomStream,
}

impl Entropy {
    pub fn new<R: Rng>(size: usize, mode: EntropyMode, rng: &mut R) -> Self {
        let bucket_count = RAND_BATCH_SIZE.min(size).max(1);
        let noise = Noise::new(size, bucket_count, rng);
        let xorshift = Xorshift128::from_rng(rng);
        Self {
            noise,
            stream: RandomStream::new(bucket_count, mode, xorshift),
        }
    }
}
