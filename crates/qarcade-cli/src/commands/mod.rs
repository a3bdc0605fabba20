pub mod play;
pub mod serve;

use clap::Args;
use qarcade_core::{Arcade, ArcadeConfig, AttackPolicy, DEFAULT_ATTACK_CHANCE};

/// Engine settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Attack policy against the independent regime: deterministic (always
    /// succeeds) or gated (succeeds with --attack-chance probability; also
    /// accepts probability, probability_gated)
    #[arg(long, default_value = "deterministic")]
    pub attack_policy: String,

    /// Success probability for the gated attack policy
    #[arg(long, default_value_t = DEFAULT_ATTACK_CHANCE)]
    pub attack_chance: f64,

    /// Seed for the independent regime stream (reproducible demos)
    #[arg(long)]
    pub seed: Option<String>,

    /// Console log capacity
    #[arg(long, default_value = "100")]
    pub log_capacity: usize,

    /// Maximum card sessions kept in memory
    #[arg(long, default_value = "1024")]
    pub max_sessions: usize,
}

/// Parse an attack policy name into the enum.
pub fn parse_attack_policy(s: &str, chance: f64) -> AttackPolicy {
    match s {
        "gated" | "probability" | "probability_gated" => AttackPolicy::ProbabilityGated { chance },
        "deterministic" => AttackPolicy::Deterministic,
        _ => {
            eprintln!("Unknown attack policy '{s}', using deterministic");
            AttackPolicy::Deterministic
        }
    }
}

impl EngineArgs {
    pub fn to_config(&self) -> ArcadeConfig {
        ArcadeConfig {
            attack_policy: parse_attack_policy(&self.attack_policy, self.attack_chance),
            independent_seed: self.seed.clone(),
            log_capacity: self.log_capacity,
            max_sessions: self.max_sessions,
        }
    }
}

/// Build an arcade from CLI flags, exiting with a message on bad settings.
pub fn make_arcade(args: &EngineArgs) -> Arcade {
    let config = args.to_config();
    log::debug!("engine config: {config:?}");
    match Arcade::new(config) {
        Ok(arcade) => arcade,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct EngineCli {
        #[command(flatten)]
        engine: EngineArgs,
    }

    fn parse_flags(args: &[&str]) -> EngineArgs {
        let argv = std::iter::once("qarcade").chain(args.iter().copied());
        EngineCli::try_parse_from(argv).unwrap().engine
    }

    fn engine_args() -> EngineArgs {
        EngineArgs {
            attack_policy: "deterministic".into(),
            attack_chance: DEFAULT_ATTACK_CHANCE,
            seed: None,
            log_capacity: 100,
            max_sessions: 1024,
        }
    }

    // -----------------------------------------------------------------------
    // parse_attack_policy tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_deterministic() {
        assert_eq!(
            parse_attack_policy("deterministic", 0.5),
            AttackPolicy::Deterministic
        );
    }

    #[test]
    fn test_parse_gated_variants() {
        for name in ["gated", "probability", "probability_gated"] {
            assert_eq!(
                parse_attack_policy(name, 0.25),
                AttackPolicy::ProbabilityGated { chance: 0.25 }
            );
        }
    }

    #[test]
    fn test_policy_aliases_reach_parser_from_flags() {
        for name in ["gated", "probability", "probability_gated"] {
            let args = parse_flags(&["--attack-policy", name, "--attack-chance", "0.2"]);
            assert_eq!(
                args.to_config().attack_policy,
                AttackPolicy::ProbabilityGated { chance: 0.2 }
            );
        }
    }

    #[test]
    fn test_unknown_policy_flag_falls_back_to_deterministic() {
        let args = parse_flags(&["--attack-policy", "sneaky"]);
        assert_eq!(args.to_config().attack_policy, AttackPolicy::Deterministic);
    }

    #[test]
    fn test_default_flags() {
        let args = parse_flags(&[]);
        assert_eq!(args.attack_policy, "deterministic");
        assert_eq!(args.to_config(), ArcadeConfig::default());
    }

    #[test]
    fn test_parse_unknown_defaults_deterministic() {
        assert_eq!(parse_attack_policy("", 0.1), AttackPolicy::Deterministic);
        assert_eq!(parse_attack_policy("GATED", 0.1), AttackPolicy::Deterministic);
    }

    // -----------------------------------------------------------------------
    // config tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_to_config_carries_flags() {
        let args = EngineArgs {
            attack_policy: "gated".into(),
            attack_chance: 0.3,
            seed: Some("2".into()),
            log_capacity: 10,
            max_sessions: 4,
        };
        let cfg = args.to_config();
        assert_eq!(cfg.attack_policy, AttackPolicy::ProbabilityGated { chance: 0.3 });
        assert_eq!(cfg.independent_seed.as_deref(), Some("2"));
        assert_eq!(cfg.log_capacity, 10);
        assert_eq!(cfg.max_sessions, 4);
    }

    #[test]
    fn test_make_arcade_default() {
        let arcade = make_arcade(&engine_args());
        assert_eq!(arcade.session_count(), 0);
        assert!(arcade.console().is_empty());
    }
}
