use qarcade_core::{Arcade, ArcadeError, Regime};
use serde_json::json;

use super::EngineArgs;

fn regime(classical: bool) -> Regime {
    Regime::from_quantum_flag(!classical)
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}

fn print_error(err: &ArcadeError) {
    print_json(&json!({ "error": err.to_string() }));
}

fn print_console(arcade: &Arcade, enabled: bool) {
    if !enabled {
        return;
    }
    println!();
    println!("Console:");
    for line in arcade.console() {
        println!("  {line}");
    }
}

fn emit<T: serde::Serialize>(result: Result<T, ArcadeError>) -> bool {
    match result.map(serde_json::to_value) {
        Ok(Ok(v)) => {
            print_json(&v);
            true
        }
        Ok(Err(e)) => {
            eprintln!("Error: {e}");
            false
        }
        Err(e) => {
            print_error(&e);
            e.is_soft()
        }
    }
}

pub fn run_spin(engine: &EngineArgs, classical: bool, eavesdrop: bool, count: usize, console: bool) {
    let mut arcade = super::make_arcade(engine);
    let mut ok = true;
    for _ in 0..count.max(1) {
        ok &= emit(arcade.spin(regime(classical), eavesdrop));
    }
    print_console(&arcade, console);
    if !ok {
        std::process::exit(1);
    }
}

pub fn run_attack(engine: &EngineArgs, classical: bool, eavesdrop: bool, console: bool) {
    let mut arcade = super::make_arcade(engine);
    let ok = emit(arcade.attack(regime(classical), eavesdrop));
    print_console(&arcade, console);
    if !ok {
        std::process::exit(1);
    }
}

pub struct CardCommandConfig<'a> {
    pub engine: &'a EngineArgs,
    pub player1: i64,
    pub player2: i64,
    pub classical: bool,
    pub eavesdrop: bool,
    pub console: bool,
}

pub fn run_cards(cfg: CardCommandConfig<'_>) {
    let mut arcade = super::make_arcade(cfg.engine);
    let session = arcade.new_session();
    let dealt = emit(arcade.deal(Some(&session), regime(cfg.classical), cfg.eavesdrop));
    let scored = dealt && emit(arcade.guess(Some(&session), cfg.player1, cfg.player2));
    print_console(&arcade, cfg.console);
    if !scored {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classical_flag_selects_independent() {
        assert_eq!(regime(true), Regime::Independent);
        assert_eq!(regime(false), Regime::Paired);
    }

    #[test]
    fn emit_reports_soft_errors_as_success() {
        assert!(emit::<()>(Err(ArcadeError::NoActiveDeal)));
        assert!(!emit::<()>(Err(ArcadeError::TamperDetected("Qubits disturbed!"))));
        assert!(emit(Ok(json!({"ok": true}))));
    }
}
