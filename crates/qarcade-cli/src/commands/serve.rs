use std::time::Duration;

use super::EngineArgs;

pub fn run(host: &str, port: u16, timeout_secs: u64, engine: &EngineArgs) {
    let arcade = super::make_arcade(engine);

    let base = format!("http://{host}:{port}");

    println!("🎰 Quantum Arcade Server v{}", qarcade_core::VERSION);
    println!("   {base}");
    println!("   attack policy: {}", arcade.config().attack_policy);
    if let Some(seed) = &engine.seed {
        println!("   independent stream seeded with {seed:?}");
    }
    println!();
    println!("   Endpoints:");
    println!("     GET /                  API index");
    println!("     GET /api/spin          Spin the slot machine");
    println!("     GET /api/attack        Try to force a jackpot");
    println!("     GET /api/card/session  Mint a card session id");
    println!("     GET /api/card/deal     Deal two cards");
    println!("     GET /api/card/guess    Score two guesses");
    println!("     GET /api/console       Recent console events");
    println!("     GET /health            Health check");
    println!();
    println!("   Query params:");
    println!("     use_quantum=true|false         Paired (default) or independent regime");
    println!("     simulate_eavesdrop=true|false  Read the outcome early");
    println!("     session=<id>                   Card session (default: shared)");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/spin?use_quantum=true'");
    println!("     curl '{base}/api/card/deal?use_quantum=false&simulate_eavesdrop=true'");
    println!("     curl '{base}/api/card/guess?player1=7&player2=12'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    let timeout = Duration::from_secs(timeout_secs.max(1));
    if let Err(e) = rt.block_on(qarcade_server::run_server(arcade, host, port, timeout)) {
        eprintln!("Error: server stopped: {e}");
        std::process::exit(1);
    }
}
