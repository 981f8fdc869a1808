//! Hold-duration strategies
//!
//! How long a reader keeps a book is a pluggable strategy so tests can run
//! with fixed (or zero) durations while production runs stay randomized.

use crate::utils::config::HoldSettings;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Strategy for how long a reader holds a book
pub trait HoldPolicy: Send + Sync {
    /// Duration of the next hold for `reader`
    fn hold_duration(&self, reader: usize) -> Duration;
}

/// Uniformly random hold within `[min, max]`
///
/// Reading time drawn uniformly from a configurable interval,
/// 1.0 to 3.0 seconds by default.
pub struct UniformHold {
    min_secs: f64,
    max_secs: f64,
    rng: Mutex<StdRng>,
}

impl UniformHold {
    /// Create with entropy-seeded randomness
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Create with a fixed seed for reproducible runs
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    /// Build from config, seeded when the config asks for it
    pub fn from_settings(settings: &HoldSettings) -> Self {
        match settings.seed {
            Some(seed) => Self::seeded(settings.min(), settings.max(), seed),
            None => Self::new(settings.min(), settings.max()),
        }
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Self {
        Self {
            min_secs: min.as_secs_f64(),
            max_secs: max.as_secs_f64(),
            rng: Mutex::new(rng),
        }
    }
}

impl HoldPolicy for UniformHold {
    fn hold_duration(&self, _reader: usize) -> Duration {
        let secs = self.rng.lock().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs_f64(secs)
    }
}

/// Constant hold, for deterministic tests
pub struct FixedHold(pub Duration);

impl HoldPolicy for FixedHold {
    fn hold_duration(&self, _reader: usize) -> Duration {
        self.0
    }
}
