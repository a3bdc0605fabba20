//! Measurement sources.
//!
//! Every source implements the [`BitSource`] trait. A source answers two
//! questions: "measure once under this regime" and "give me a plain uniform
//! integer" (the Independent regime's shortcut for card draws). The
//! disturbance rules live one layer up in [`crate::sampling`]; sources only
//! produce raw outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::error::{ArcadeError, Result};
use crate::regime::{Measurement, Regime};

/// Trait that every measurement source must implement.
pub trait BitSource: Send {
    /// Perform one measurement round under `regime`.
    ///
    /// Paired sources must return [`Measurement::Pair`] with both sites
    /// equal; Independent sources return [`Measurement::Single`].
    fn measure(&mut self, regime: Regime) -> Measurement;

    /// Uniform integer in `low..=high` from the Independent stream.
    fn draw_range(&mut self, low: u32, high: u32) -> u32;
}

/// Software model of the two regimes.
///
/// Paired rounds flip one fair coin and copy it to both sites. Independent
/// rounds flip one coin for a single site. The two regimes draw from
/// separate streams so that seeding the Independent stream (for
/// reproducible demos) never makes Paired outcomes predictable.
pub struct SimulatedSource {
    paired: StdRng,
    independent: StdRng,
}

impl SimulatedSource {
    /// Create a source. The Paired stream is always seeded from the OS; the
    /// Independent stream uses `independent_seed` when given.
    pub fn new(independent_seed: Option<&str>) -> Result<Self> {
        let paired = os_seed()?;
        let independent = match independent_seed {
            Some(seed) => hash_seed(seed.as_bytes()),
            None => os_seed()?,
        };
        Ok(Self::from_seeds(paired, independent))
    }

    /// Create a fully deterministic source.
    pub fn from_seeds(paired: [u8; 32], independent: [u8; 32]) -> Self {
        Self {
            paired: StdRng::from_seed(paired),
            independent: StdRng::from_seed(independent),
        }
    }
}

impl BitSource for SimulatedSource {
    fn measure(&mut self, regime: Regime) -> Measurement {
        match regime {
            Regime::Paired => {
                let shared = u8::from(self.paired.random::<bool>());
                Measurement::Pair(shared, shared)
            }
            Regime::Independent => Measurement::Single(u8::from(self.independent.random::<bool>())),
        }
    }

    fn draw_range(&mut self, low: u32, high: u32) -> u32 {
        self.independent.random_range(low..=high)
    }
}

/// Derive a 32-byte seed from arbitrary bytes.
pub fn hash_seed(material: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(material);
    h.finalize().into()
}

fn os_seed() -> Result<[u8; 32]> {
    let mut seed = [0u8; 32];
    getrandom::fill(&mut seed).map_err(|e| ArcadeError::Entropy(e.to_string()))?;
    Ok(seed)
}
