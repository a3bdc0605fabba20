//! Two-card guessing game.
//!
//! A deal draws two cards in `1..=10` and keeps their sum as a hidden target.
//! Two players guess; whoever lands closer wins. Deals are stored per
//! session so concurrent players never score against each other's cards.
//!
//! ```text
//!   NoDeal ──deal──▶ Dealt ──deal──▶ Dealt (previous deal discarded)
//!                      │
//!                    guess (read-only, repeatable)
//! ```

use std::collections::{HashMap, VecDeque};

use serde::{Serialize, Serializer};

use crate::config::DEFAULT_MAX_SESSIONS;
use crate::error::{ArcadeError, Result};
use crate::event_log::EventLog;
use crate::regime::Regime;
use crate::sampling::choose;
use crate::source::BitSource;

/// Session used when the caller doesn't name one.
pub const DEFAULT_SESSION: &str = "default";

/// Face values a card can take.
pub const CARD_VALUES: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// The current deal of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardDeal {
    pub card1: u32,
    pub card2: u32,
    pub sum: u32,
    pub regime: Regime,
}

impl CardDeal {
    pub fn new(card1: u32, card2: u32, regime: Regime) -> Self {
        Self {
            card1,
            card2,
            sum: card1 + card2,
            regime,
        }
    }
}

/// A card as shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Value(u32),
    /// Withheld because reading it would disturb the deal. Renders as `"?"`.
    Hidden,
}

impl Serialize for CardFace {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_u32(*v),
            Self::Hidden => serializer.serialize_str("?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealResponse {
    pub session: String,
    pub card1: CardFace,
    pub card2: CardFace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<u32>,
    pub message: String,
    pub tamper_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player1,
    Player2,
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player1 => write!(f, "Player 1"),
            Self::Player2 => write!(f, "Player 2"),
            Self::Tie => write!(f, "Tie"),
        }
    }
}

impl Serialize for Winner {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessResult {
    pub target: u32,
    pub player1_guess: i64,
    pub player2_guess: i64,
    pub winner: Winner,
}

/// Closer guess wins; equal distance is a tie.
pub fn score(target: u32, guess1: i64, guess2: i64) -> Winner {
    let target = i64::from(target);
    let diff1 = guess1.abs_diff(target);
    let diff2 = guess2.abs_diff(target);
    match diff1.cmp(&diff2) {
        std::cmp::Ordering::Less => Winner::Player1,
        std::cmp::Ordering::Greater => Winner::Player2,
        std::cmp::Ordering::Equal => Winner::Tie,
    }
}

/// Session-keyed deal storage.
///
/// Holds at most `max_sessions` deals; a deal for a new session beyond
/// that evicts the session created longest ago.
#[derive(Debug, Clone)]
pub struct CardTable {
    deals: HashMap<String, CardDeal>,
    created: VecDeque<String>,
    max_sessions: usize,
}

impl Default for CardTable {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl CardTable {
    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            deals: HashMap::new(),
            created: VecDeque::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of sessions holding a deal.
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn current(&self, session: &str) -> Option<&CardDeal> {
        self.deals.get(session)
    }

    /// Make `deal` the session's current deal, replacing any previous one.
    pub fn insert(&mut self, session: &str, deal: CardDeal) {
        if !self.deals.contains_key(session) {
            if self.deals.len() >= self.max_sessions {
                if let Some(oldest) = self.created.pop_front() {
                    log::info!("card table full, evicting session {oldest}");
                    self.deals.remove(&oldest);
                }
            }
            self.created.push_back(session.to_string());
        }
        self.deals.insert(session.to_string(), deal);
    }

    /// Deal two fresh cards for `session`.
    ///
    /// Paired deals are drawn through the rejection sampler; Independent
    /// deals use a plain uniform draw. With `reveal_early` on a Paired deal
    /// the cards are still stored but the response withholds them.
    pub fn deal<S: BitSource + ?Sized>(
        &mut self,
        source: &mut S,
        log: &mut EventLog,
        session: &str,
        regime: Regime,
        reveal_early: bool,
    ) -> Result<DealResponse> {
        let (card1, card2) = match regime {
            Regime::Paired => (
                *choose(source, log, &CARD_VALUES, regime, false)?,
                *choose(source, log, &CARD_VALUES, regime, false)?,
            ),
            Regime::Independent => (source.draw_range(1, 10), source.draw_range(1, 10)),
        };
        let deal = CardDeal::new(card1, card2, regime);
        self.insert(session, deal);

        let revealed = DealResponse {
            session: session.to_string(),
            card1: CardFace::Value(deal.card1),
            card2: CardFace::Value(deal.card2),
            sum: Some(deal.sum),
            message: String::new(),
            tamper_detected: false,
        };

        let response = match (regime, reveal_early) {
            (Regime::Paired, true) => {
                log.record("Dealt cards (paired): early read detected, cards withheld.");
                DealResponse {
                    card1: CardFace::Hidden,
                    card2: CardFace::Hidden,
                    sum: None,
                    message: "Error! Tampering detected: Qubits disturbed.".into(),
                    tamper_detected: true,
                    ..revealed
                }
            }
            (Regime::Paired, false) => {
                log.record("Dealt cards (paired): values sealed until guessed.");
                DealResponse {
                    message: "Cards dealt in quantum mode.".into(),
                    ..revealed
                }
            }
            (Regime::Independent, reveal) => {
                log.record(format!(
                    "Dealt cards (independent): {} + {} = {}",
                    deal.card1, deal.card2, deal.sum
                ));
                let message = if reveal {
                    "Classical eavesdropping: Cards and sum revealed!"
                } else {
                    "Cards dealt in classical mode. Target revealed."
                };
                DealResponse {
                    message: message.into(),
                    ..revealed
                }
            }
        };
        Ok(response)
    }

    /// Score two guesses against the session's current deal.
    pub fn guess(
        &self,
        log: &mut EventLog,
        session: &str,
        guess1: i64,
        guess2: i64,
    ) -> Result<GuessResult> {
        let deal = self.current(session).ok_or(ArcadeError::NoActiveDeal)?;
        let winner = score(deal.sum, guess1, guess2);
        log.record(format!(
            "Card game guess: target {}, Player 1 guessed {guess1}, Player 2 guessed {guess2}, winner: {winner}",
            deal.sum
        ));
        Ok(GuessResult {
            target: deal.sum,
            player1_guess: guess1,
            player2_guess: guess2,
            winner,
        })
    }
}
