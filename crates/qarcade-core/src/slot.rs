//! Three-reel slot machine and the attack simulation against it.

use serde::{Serialize, Serializer};

use crate::config::AttackPolicy;
use crate::error::Result;
use crate::event_log::EventLog;
use crate::regime::Regime;
use crate::sampling::{choose, sample_integer};
use crate::source::BitSource;

/// Reel symbols, lowest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Star,
    Bell,
    Diamond,
}

/// The fixed reel alphabet.
pub const SYMBOLS: [Symbol; 6] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Star,
    Symbol::Bell,
    Symbol::Diamond,
];

impl Symbol {
    /// Top-tier symbol an attacker forces.
    pub const JACKPOT: Symbol = Symbol::Diamond;

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Cherry => "🍒",
            Self::Lemon => "🍋",
            Self::Orange => "🍊",
            Self::Star => "⭐",
            Self::Bell => "🔔",
            Self::Diamond => "💎",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glyph())
    }
}

/// Outcome of one spin, left reel first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotReels(pub [Symbol; 3]);

impl SlotReels {
    pub const JACKPOT: SlotReels = SlotReels([Symbol::JACKPOT; 3]);

    pub fn is_jackpot(&self) -> bool {
        *self == Self::JACKPOT
    }
}

impl std::fmt::Display for SlotReels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a} {b} {c}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackStatus {
    Success,
    Fail,
}

/// Result of an attack attempt. `result` is the forced jackpot on success,
/// or the honest spin that the attacker failed to influence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttackOutcome {
    pub status: AttackStatus,
    pub message: String,
    pub result: SlotReels,
}

/// Spin all three reels.
///
/// `observed` is forwarded to the sampler: an observed Paired spin fails
/// with `TamperDetected` before any reel is drawn.
pub fn spin<S: BitSource + ?Sized>(
    source: &mut S,
    log: &mut EventLog,
    regime: Regime,
    observed: bool,
) -> Result<SlotReels> {
    let mut reels = [Symbol::Cherry; 3];
    for reel in &mut reels {
        *reel = *choose(source, log, &SYMBOLS, regime, observed)?;
    }
    let reels = SlotReels(reels);
    log.record(format!("Spin outcome (regime={regime}): {reels}"));
    Ok(reels)
}

/// Try to force a jackpot.
pub fn attack<S: BitSource + ?Sized>(
    source: &mut S,
    log: &mut EventLog,
    regime: Regime,
    policy: AttackPolicy,
) -> Result<AttackOutcome> {
    if regime == Regime::Paired {
        let honest = spin(source, log, Regime::Paired, false)?;
        log.record("Attack attempted on paired regime; tampering prevented.");
        return Ok(AttackOutcome {
            status: AttackStatus::Fail,
            message: "Attack ineffective when entanglement is enabled.".into(),
            result: honest,
        });
    }

    let forced = match policy {
        AttackPolicy::Deterministic => true,
        AttackPolicy::ProbabilityGated { chance } => {
            let roll = sample_integer(source, log, 8, 256, Regime::Independent, false)?;
            f64::from(roll) / 255.0 < chance
        }
    };

    if forced {
        log.record("Attack successful! Forced jackpot outcome on independent regime.");
        Ok(AttackOutcome {
            status: AttackStatus::Success,
            message: "Attack successful! Forced jackpot outcome.".into(),
            result: SlotReels::JACKPOT,
        })
    } else {
        let honest = spin(source, log, Regime::Independent, false)?;
        log.record("Attack failed! Independent-regime tampering did not succeed.");
        Ok(AttackOutcome {
            status: AttackStatus::Fail,
            message: "Attack failed! Tampering attempt detected.".into(),
            result: honest,
        })
    }
}
