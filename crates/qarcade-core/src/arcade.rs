//! The arcade: one measurement source, one console, one card table.
//!
//! [`Arcade`] is the unit the HTTP layer wraps in a lock. All operations take
//! `&mut self`, so a console append or a deal replacement is never observed
//! half-done.

use serde::Serialize;
use uuid::Uuid;

use crate::card::{CardTable, DEFAULT_SESSION, DealResponse, GuessResult};
use crate::config::ArcadeConfig;
use crate::error::{ArcadeError, Result};
use crate::event_log::EventLog;
use crate::regime::Regime;
use crate::slot::{self, AttackOutcome, SlotReels};
use crate::source::{BitSource, SimulatedSource};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinResponse {
    pub result: SlotReels,
    pub use_quantum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub struct Arcade<S: BitSource = SimulatedSource> {
    source: S,
    log: EventLog,
    table: CardTable,
    config: ArcadeConfig,
}

impl Arcade<SimulatedSource> {
    /// Build an arcade backed by the simulated source.
    pub fn new(config: ArcadeConfig) -> Result<Self> {
        let source = SimulatedSource::new(config.independent_seed.as_deref())?;
        Self::with_source(config, source)
    }
}

impl<S: BitSource> Arcade<S> {
    /// Build an arcade around any measurement source.
    pub fn with_source(config: ArcadeConfig, source: S) -> Result<Self> {
        config.validate()?;
        log::info!(
            "arcade ready: attack policy {}, log capacity {}, max sessions {}",
            config.attack_policy,
            config.log_capacity,
            config.max_sessions
        );
        Ok(Self {
            source,
            log: EventLog::with_capacity(config.log_capacity),
            table: CardTable::with_max_sessions(config.max_sessions),
            config,
        })
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Console lines, oldest first.
    pub fn console(&self) -> Vec<String> {
        self.log.lines()
    }

    pub fn session_count(&self) -> usize {
        self.table.len()
    }

    /// Spin the slot machine. An eavesdropped Paired spin is rejected.
    pub fn spin(&mut self, regime: Regime, eavesdrop: bool) -> Result<SpinResponse> {
        let result = match slot::spin(&mut self.source, &mut self.log, regime, eavesdrop) {
            Ok(reels) => reels,
            Err(e @ ArcadeError::TamperDetected(_)) => {
                log::warn!("eavesdropped paired spin rejected");
                self.log.record("Eavesdropping on paired spin detected; spin aborted.");
                return Err(e);
            }
            Err(e) => return Err(e),
        };
        let message = eavesdrop.then(|| "Classical eavesdropping: outcome revealed!".to_string());
        Ok(SpinResponse {
            result,
            use_quantum: regime.is_quantum(),
            message,
        })
    }

    /// Attack the slot machine under the configured policy.
    pub fn attack(&mut self, regime: Regime, eavesdrop: bool) -> Result<AttackOutcome> {
        if eavesdrop && regime == Regime::Paired {
            log::warn!("eavesdropped paired attack rejected");
            self.log.record("Eavesdropping during paired attack detected; attack aborted.");
            return Err(ArcadeError::TamperDetected("Qubits disturbed during attack!"));
        }
        let mut outcome = slot::attack(
            &mut self.source,
            &mut self.log,
            regime,
            self.config.attack_policy,
        )?;
        if eavesdrop {
            outcome.message.push_str(" (Classical eavesdropping simulated)");
        }
        Ok(outcome)
    }

    /// Mint a fresh card session id.
    pub fn new_session(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        log::debug!("new card session {id}");
        id
    }

    /// Deal for `session`, or the shared default session.
    pub fn deal(
        &mut self,
        session: Option<&str>,
        regime: Regime,
        reveal_early: bool,
    ) -> Result<DealResponse> {
        let session = session.unwrap_or(DEFAULT_SESSION);
        self.table
            .deal(&mut self.source, &mut self.log, session, regime, reveal_early)
    }

    /// Score a guess for `session`, or the shared default session.
    pub fn guess(&mut self, session: Option<&str>, guess1: i64, guess2: i64) -> Result<GuessResult> {
        let session = session.unwrap_or(DEFAULT_SESSION);
        self.table.guess(&mut self.log, session, guess1, guess2)
    }
}
