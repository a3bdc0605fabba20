//! Bit sampling, rejection-sampled integers and uniform choice.
//!
//! This module is the single place where the disturbance rule is enforced:
//! an observed read of the Paired regime fails with
//! [`ArcadeError::TamperDetected`] before the source is touched, so no
//! partial bits ever leak.
//!
//! # Rejection sampling
//!
//! `sample_integer(n_bits, max_value)` draws `n_bits` bits MSB-first and
//! discards any value `>= max_value`. `n_bits` must equal
//! `ceil(log2(max_value))`; anything else is rejected before sampling. At
//! that width at least half of all draws are accepted, so the retry ceiling
//! below only trips on a broken source.

use crate::error::{ArcadeError, Result};
use crate::event_log::EventLog;
use crate::regime::Regime;
use crate::source::BitSource;

/// Upper bound on rejected rounds before giving up.
pub const MAX_REJECTION_ROUNDS: u32 = 4096;

/// Widest integer the sampler assembles.
pub const MAX_BITS: u32 = 31;

/// `ceil(log2(n))`, the number of bits needed to index `n` values.
pub fn bits_for(n: u32) -> Result<u32> {
    match n {
        0 => Err(ArcadeError::InvalidArgument(
            "cannot size a sample space of zero values".into(),
        )),
        1 => Ok(0),
        _ => Ok(u32::BITS - (n - 1).leading_zeros()),
    }
}

/// Measure one bit under `regime`.
///
/// `observed` marks an instrumented (eavesdropping) read. Paired reads that
/// are observed fail without consuming randomness.
pub fn sample_bit<S: BitSource + ?Sized>(
    source: &mut S,
    regime: Regime,
    observed: bool,
) -> Result<u8> {
    if observed && !regime.observable_without_disturbance() {
        return Err(ArcadeError::TamperDetected("Qubits disturbed!"));
    }
    source
        .measure(regime)
        .bit()
        .ok_or_else(|| ArcadeError::Internal("paired measurement sites disagree".into()))
}

/// Rejection-sample an integer in `[0, max_value)` from `n_bits` bits.
///
/// Only the accepted value is written to the console log.
pub fn sample_integer<S: BitSource + ?Sized>(
    source: &mut S,
    log: &mut EventLog,
    n_bits: u32,
    max_value: u32,
    regime: Regime,
    observed: bool,
) -> Result<u32> {
    if max_value == 0 {
        return Err(ArcadeError::InvalidArgument(
            "max_value must be positive".into(),
        ));
    }
    if n_bits > MAX_BITS {
        return Err(ArcadeError::InvalidArgument(format!(
            "n_bits {n_bits} exceeds the {MAX_BITS}-bit limit"
        )));
    }
    let needed = bits_for(max_value)?;
    if n_bits != needed {
        return Err(ArcadeError::InvalidArgument(format!(
            "max_value {max_value} needs exactly {needed} bits, got {n_bits}"
        )));
    }
    if observed && !regime.observable_without_disturbance() {
        return Err(ArcadeError::TamperDetected("Qubits disturbed!"));
    }

    let mut bits = Vec::with_capacity(n_bits as usize);
    for _ in 0..MAX_REJECTION_ROUNDS {
        bits.clear();
        let mut number = 0u32;
        for _ in 0..n_bits {
            let bit = sample_bit(source, regime, observed)?;
            bits.push(bit);
            number = (number << 1) | u32::from(bit);
        }
        if number < max_value {
            let label = match regime {
                Regime::Paired => "Entangled",
                Regime::Independent => "Independent",
            };
            log.record(format!("{label} sampler: bits {bits:?} => number {number}"));
            return Ok(number);
        }
    }
    Err(ArcadeError::InvalidArgument(format!(
        "rejection sampling found no value below {max_value} in {MAX_REJECTION_ROUNDS} rounds"
    )))
}

/// Pick one element of `options` uniformly.
pub fn choose<'a, T, S: BitSource + ?Sized>(
    source: &mut S,
    log: &mut EventLog,
    options: &'a [T],
    regime: Regime,
    observed: bool,
) -> Result<&'a T> {
    if options.is_empty() {
        return Err(ArcadeError::InvalidArgument(
            "cannot choose from an empty option set".into(),
        ));
    }
    let n = u32::try_from(options.len())
        .map_err(|_| ArcadeError::InvalidArgument("option set too large".into()))?;
    let n_bits = bits_for(n)?;
    if n_bits > MAX_BITS {
        return Err(ArcadeError::InvalidArgument("option set too large".into()));
    }
    let span = 1u32 << n_bits;

    for _ in 0..MAX_REJECTION_ROUNDS {
        let index = sample_integer(source, log, n_bits, span, regime, observed)?;
        if index < n {
            return Ok(&options[index as usize]);
        }
    }
    Err(ArcadeError::InvalidArgument(format!(
        "no index below {n} drawn in {MAX_REJECTION_ROUNDS} rounds"
    )))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::regime::Measurement;
    use crate::source::SimulatedSource;

    /// Replays a fixed bit script and counts how many measurements it served.
    pub(crate) struct ScriptedSource {
        bits: VecDeque<u8>,
        draws: VecDeque<u32>,
        pub(crate) measurements: usize,
    }

    impl ScriptedSource {
        pub(crate) fn new(bits: &[u8]) -> Self {
            Self {
                bits: bits.iter().copied().collect(),
                draws: VecDeque::new(),
                measurements: 0,
            }
        }

        pub(crate) fn with_draws(mut self, draws: &[u32]) -> Self {
            self.draws = draws.iter().copied().collect();
            self
        }
    }

    impl BitSource for ScriptedSource {
        fn measure(&mut self, regime: Regime) -> Measurement {
            self.measurements += 1;
            let bit = self.bits.pop_front().expect("bit script exhausted");
            match regime {
                Regime::Paired => Measurement::Pair(bit, bit),
                Regime::Independent => Measurement::Single(bit),
            }
        }

        fn draw_range(&mut self, low: u32, high: u32) -> u32 {
            let v = self.draws.pop_front().expect("draw script exhausted");
            assert!((low..=high).contains(&v), "scripted draw {v} outside {low}..={high}");
            v
        }
    }

    struct DisagreeingSource;

    impl BitSource for DisagreeingSource {
        fn measure(&mut self, _regime: Regime) -> Measurement {
            Measurement::Pair(0, 1)
        }
        fn draw_range(&mut self, low: u32, _high: u32) -> u32 {
            low
        }
    }

    // -----------------------------------------------------------------------
    // bits_for
    // -----------------------------------------------------------------------

    #[test]
    fn bits_for_matches_ceil_log2() {
        assert_eq!(bits_for(1).unwrap(), 0);
        assert_eq!(bits_for(2).unwrap(), 1);
        assert_eq!(bits_for(3).unwrap(), 2);
        assert_eq!(bits_for(6).unwrap(), 3);
        assert_eq!(bits_for(8).unwrap(), 3);
        assert_eq!(bits_for(10).unwrap(), 4);
        assert_eq!(bits_for(256).unwrap(), 8);
        assert_eq!(bits_for(257).unwrap(), 9);
    }

    #[test]
    fn bits_for_zero_is_invalid() {
        assert!(matches!(bits_for(0), Err(ArcadeError::InvalidArgument(_))));
    }

    // -----------------------------------------------------------------------
    // sample_bit
    // -----------------------------------------------------------------------

    #[test]
    fn observed_paired_bit_fails_without_measuring() {
        let mut src = ScriptedSource::new(&[1]);
        let err = sample_bit(&mut src, Regime::Paired, true).unwrap_err();
        assert_eq!(err, ArcadeError::TamperDetected("Qubits disturbed!"));
        assert_eq!(src.measurements, 0);
    }

    #[test]
    fn observed_independent_bit_is_returned() {
        let mut src = ScriptedSource::new(&[1]);
        assert_eq!(sample_bit(&mut src, Regime::Independent, true).unwrap(), 1);
    }

    #[test]
    fn disagreeing_pair_is_internal_error() {
        let err = sample_bit(&mut DisagreeingSource, Regime::Paired, false).unwrap_err();
        assert!(matches!(err, ArcadeError::Internal(_)));
    }

    // -----------------------------------------------------------------------
    // sample_integer
    // -----------------------------------------------------------------------

    #[test]
    fn assembles_msb_first() {
        let mut src = ScriptedSource::new(&[1, 0, 1]);
        let mut log = EventLog::default();
        let v = sample_integer(&mut src, &mut log, 3, 8, Regime::Paired, false).unwrap();
        assert_eq!(v, 5);
    }

    #[test]
    fn rejects_out_of_range_and_logs_only_accepted() {
        // 0b111 = 7 rejected for max 6, then 0b010 = 2 accepted.
        let mut src = ScriptedSource::new(&[1, 1, 1, 0, 1, 0]);
        let mut log = EventLog::default();
        let v = sample_integer(&mut src, &mut log, 3, 6, Regime::Independent, false).unwrap();
        assert_eq!(v, 2);
        assert_eq!(src.measurements, 6);
        assert_eq!(log.len(), 1);
        let entry = log.entries().next().unwrap();
        assert_eq!(entry.message, "Independent sampler: bits [0, 1, 0] => number 2");
    }

    #[test]
    fn values_stay_below_max() {
        let mut src = SimulatedSource::from_seeds([7; 32], [8; 32]);
        let mut log = EventLog::default();
        for max in 1..=40u32 {
            let n_bits = bits_for(max).unwrap();
            for regime in [Regime::Paired, Regime::Independent] {
                for _ in 0..50 {
                    let v = sample_integer(&mut src, &mut log, n_bits, max, regime, false).unwrap();
                    assert!(v < max, "{v} >= {max}");
                }
            }
        }
    }

    #[test]
    fn observed_paired_integer_fails_fast() {
        let mut src = ScriptedSource::new(&[]);
        let mut log = EventLog::default();
        let err = sample_integer(&mut src, &mut log, 3, 6, Regime::Paired, true).unwrap_err();
        assert!(matches!(err, ArcadeError::TamperDetected(_)));
        assert_eq!(src.measurements, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn contract_violations_are_invalid_arguments() {
        let mut src = ScriptedSource::new(&[]);
        let mut log = EventLog::default();
        for (n_bits, max) in [(3, 0), (3, 9), (32, 10), (24, 1), (8, 10), (2, 2)] {
            let err = sample_integer(&mut src, &mut log, n_bits, max, Regime::Paired, false)
                .unwrap_err();
            assert!(matches!(err, ArcadeError::InvalidArgument(_)), "{n_bits}/{max}");
        }
        assert_eq!(src.measurements, 0);
    }

    #[test]
    fn zero_bits_with_single_value() {
        let mut src = ScriptedSource::new(&[]);
        let mut log = EventLog::default();
        assert_eq!(
            sample_integer(&mut src, &mut log, 0, 1, Regime::Paired, false).unwrap(),
            0
        );
    }

    // -----------------------------------------------------------------------
    // choose
    // -----------------------------------------------------------------------

    #[test]
    fn choose_from_empty_is_invalid() {
        let mut src = ScriptedSource::new(&[]);
        let mut log = EventLog::default();
        let empty: [u8; 0] = [];
        let err = choose(&mut src, &mut log, &empty, Regime::Paired, false).unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidArgument(_)));
    }

    #[test]
    fn choose_single_option_needs_no_bits() {
        let mut src = ScriptedSource::new(&[]);
        let mut log = EventLog::default();
        assert_eq!(*choose(&mut src, &mut log, &["only"], Regime::Paired, false).unwrap(), "only");
        assert_eq!(src.measurements, 0);
    }

    #[test]
    fn choose_skips_indices_past_the_end() {
        // 6 options → 3 bits: 0b110 = 6 and 0b111 = 7 are skipped, 0b011 = 3 is used.
        let mut src = ScriptedSource::new(&[1, 1, 0, 1, 1, 1, 0, 1, 1]);
        let mut log = EventLog::default();
        let options = ['a', 'b', 'c', 'd', 'e', 'f'];
        let pick = choose(&mut src, &mut log, &options, Regime::Paired, false).unwrap();
        assert_eq!(*pick, 'd');
        assert_eq!(src.measurements, 9);
    }
}
