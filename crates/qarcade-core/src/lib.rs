//! # qarcade-core
//!
//! **Entangled pairs can't be peeked at. Independent coins can.**
//!
//! `qarcade-core` simulates a random measurement source with two regimes and
//! drives two small games with it:
//!
//! - **Paired**: two measurement sites that always agree. Reading them early
//!   disturbs the pair, so an eavesdropping read fails with
//!   [`ArcadeError::TamperDetected`] before any randomness is consumed.
//! - **Independent**: a single free-standing fair coin. It can be read (or
//!   forced) by an attacker without anyone noticing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qarcade_core::{Arcade, ArcadeConfig, Regime};
//!
//! let mut arcade = Arcade::new(ArcadeConfig::default()).unwrap();
//!
//! let spin = arcade.spin(Regime::Paired, false).unwrap();
//! println!("{}", spin.result);
//!
//! let deal = arcade.deal(None, Regime::Independent, false).unwrap();
//! let guess = arcade.guess(Some(&deal.session), 9, 12).unwrap();
//! println!("{} wins", guess.winner);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Arcade → SlotMachine / CardTable → choose → sample_integer → sample_bit → BitSource
//!                                   ╰──────────── EventLog ────────────╯
//! ```
//!
//! Every accepted sample, spin, attack, deal and guess is appended to the
//! bounded [`EventLog`], which backs the user-visible console.

pub mod arcade;
pub mod card;
pub mod config;
pub mod error;
pub mod event_log;
pub mod regime;
pub mod sampling;
pub mod slot;
pub mod source;

pub use arcade::{Arcade, SpinResponse};
pub use card::{CardDeal, CardFace, CardTable, DEFAULT_SESSION, DealResponse, GuessResult, Winner};
pub use config::{AttackPolicy, ArcadeConfig, DEFAULT_ATTACK_CHANCE};
pub use error::{ArcadeError, Result};
pub use event_log::{DEFAULT_LOG_CAPACITY, EventLog, EventLogEntry};
pub use regime::{Measurement, Regime};
pub use sampling::{bits_for, choose, sample_bit, sample_integer};
pub use slot::{AttackOutcome, AttackStatus, SYMBOLS, SlotReels, Symbol};
pub use source::{BitSource, SimulatedSource};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
