//! Measurement regimes and the raw outcome of a single measurement.

use serde::{Deserialize, Serialize};

/// Behavioral mode of the simulated measurement source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Two entangled sites that always agree. Observing them early disturbs
    /// the pair.
    #[default]
    Paired,
    /// One freely observable fair coin.
    Independent,
}

impl Regime {
    /// Map the boundary's `use_quantum` flag onto a regime.
    pub fn from_quantum_flag(use_quantum: bool) -> Self {
        if use_quantum {
            Self::Paired
        } else {
            Self::Independent
        }
    }

    /// Inverse of [`Regime::from_quantum_flag`].
    pub fn is_quantum(self) -> bool {
        self == Self::Paired
    }

    /// Whether an early read of this regime's state goes unnoticed.
    pub fn observable_without_disturbance(self) -> bool {
        self == Self::Independent
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paired => write!(f, "paired"),
            Self::Independent => write!(f, "independent"),
        }
    }
}

/// Outcome of one measurement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    /// Both sites of an entangled pair, `(site_a, site_b)`.
    Pair(u8, u8),
    /// A single free-standing site.
    Single(u8),
}

impl Measurement {
    /// The shared bit, or `None` when a pair disagrees.
    pub fn bit(self) -> Option<u8> {
        match self {
            Self::Pair(a, b) if a == b => Some(a & 1),
            Self::Pair(..) => None,
            Self::Single(b) => Some(b & 1),
        }
    }
}
