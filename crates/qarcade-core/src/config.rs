//! Runtime configuration for the arcade engine.

use crate::error::{ArcadeError, Result};
use crate::event_log::DEFAULT_LOG_CAPACITY;

/// Success chance used by [`AttackPolicy::ProbabilityGated`] when none is given.
pub const DEFAULT_ATTACK_CHANCE: f64 = 0.1;

/// Default cap on concurrently tracked card sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// How an attack against the Independent regime plays out.
///
/// Paired-regime attacks always fail regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttackPolicy {
    /// The attacker always forces the jackpot.
    #[default]
    Deterministic,
    /// The attacker forces the jackpot with probability `chance`, judged by
    /// an 8-bit Independent sample scaled to `[0, 1]`.
    ProbabilityGated { chance: f64 },
}

impl std::fmt::Display for AttackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deterministic => write!(f, "deterministic"),
            Self::ProbabilityGated { chance } => write!(f, "gated({chance})"),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeConfig {
    pub attack_policy: AttackPolicy,
    /// Seed for the Independent stream. `None` draws from the OS.
    pub independent_seed: Option<String>,
    /// Console log capacity.
    pub log_capacity: usize,
    /// Maximum card sessions kept before the oldest is evicted.
    pub max_sessions: usize,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            attack_policy: AttackPolicy::default(),
            independent_seed: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl ArcadeConfig {
    /// Reject settings the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if let AttackPolicy::ProbabilityGated { chance } = self.attack_policy {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ArcadeError::InvalidArgument(format!(
                    "attack chance {chance} outside [0, 1]"
                )));
            }
        }
        if self.log_capacity == 0 {
            return Err(ArcadeError::InvalidArgument(
                "log capacity must be at least 1".into(),
            ));
        }
        if self.max_sessions == 0 {
            return Err(ArcadeError::InvalidArgument(
                "max sessions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = ArcadeConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.attack_policy, AttackPolicy::Deterministic);
        assert_eq!(cfg.log_capacity, 100);
    }

    #[test]
    fn gated_chance_must_be_a_probability() {
        for chance in [-0.1, 1.5, f64::NAN] {
            let cfg = ArcadeConfig {
                attack_policy: AttackPolicy::ProbabilityGated { chance },
                ..ArcadeConfig::default()
            };
            assert!(cfg.validate().is_err(), "chance {chance} accepted");
        }
        let cfg = ArcadeConfig {
            attack_policy: AttackPolicy::ProbabilityGated {
                chance: DEFAULT_ATTACK_CHANCE,
            },
            ..ArcadeConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_capacities_rejected() {
        let cfg = ArcadeConfig {
            log_capacity: 0,
            ..ArcadeConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = ArcadeConfig {
            max_sessions: 0,
            ..ArcadeConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn policy_display() {
        assert_eq!(AttackPolicy::Deterministic.to_string(), "deterministic");
        assert_eq!(
            AttackPolicy::ProbabilityGated { chance: 0.1 }.to_string(),
            "gated(0.1)"
        );
    }
}
