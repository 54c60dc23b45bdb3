use std::sync::{Mutex, PoisonError};

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Produces candidate short codes. Generators never consult the store;
/// uniqueness is enforced on insert.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws codes uniformly from `[A-Za-z0-9]` using a shared random source.
pub struct AlphanumericGenerator<R = StdRng> {
    rng: Mutex<R>,
    length: usize,
}

impl AlphanumericGenerator<StdRng> {
    pub fn from_entropy(length: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), length)
    }

    pub fn seeded(seed: u64, length: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), length)
    }
}

impl<R: Rng + Send> AlphanumericGenerator<R> {
    pub fn with_rng(rng: R, length: usize) -> Self {
        AlphanumericGenerator {
            rng: Mutex::new(rng),
            length,
        }
    }
}

impl<R: Rng + Send> CodeGenerator for AlphanumericGenerator<R> {
    fn generate(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        random_code(&mut *rng, self.length)
    }
}

/// Alphanumeric generator backed by the per-thread rng; no shared state.
#[derive(Debug, Clone, Copy)]
pub struct ThreadRngGenerator {
    length: usize,
}

impl ThreadRngGenerator {
    pub fn new(length: usize) -> Self {
        ThreadRngGenerator { length }
    }
}

impl Default for ThreadRngGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for ThreadRngGenerator {
    fn generate(&self) -> String {
        random_code(&mut thread_rng(), self.length)
    }
}

fn random_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}
