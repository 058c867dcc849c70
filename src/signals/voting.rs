// =============================================================================
// Voting Aggregator — count agreeing strategies
// =============================================================================
//
// Runs every strategy against the same series, counts buy votes, and marks
// the ticker a potential buy when at least `min_votes` strategies agree.
//
// Failure policy: each strategy is evaluated in isolation.  An error (or a
// panic) inside one strategy becomes an indeterminate vote, counted as
// "no", and the remaining strategies still run.
// =============================================================================

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::IndicatorError;
use crate::market_data::Series;
use crate::runtime_config::StrategyParams;
use crate::strategies::{standard_strategies, Strategy};

/// How a single strategy voted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VoteStatus {
    Signal,
    NoSignal,
    Indeterminate { kind: &'static str, reason: String },
}

/// The contribution of a single strategy to the tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyVote {
    pub strategy: &'static str,
    #[serde(flatten)]
    pub status: VoteStatus,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<&'static str, f64>,
}

impl StrategyVote {
    pub fn is_buy(&self) -> bool {
        self.status == VoteStatus::Signal
    }
}

/// Result of running the aggregator over one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteTally {
    pub vote_count: usize,
    pub total: usize,
    pub decision: bool,
    pub votes: Vec<StrategyVote>,
}

/// Counts buy votes across a fixed set of strategies.
pub struct VotingAggregator {
    strategies: Vec<Box<dyn Strategy>>,
    /// Minimum number of agreeing strategies for a potential buy.
    pub min_votes: usize,
}

impl VotingAggregator {
    pub fn new(strategies: Vec<Box<dyn Strategy>>, min_votes: usize) -> Self {
        Self {
            strategies,
            min_votes,
        }
    }

    /// The standard six strategies with the given parameters.
    pub fn standard(params: &StrategyParams, min_votes: usize) -> Self {
        Self::new(standard_strategies(params), min_votes)
    }

    /// Number of strategies that vote.
    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Run every strategy on `series` and tally the votes.
    pub fn evaluate(&self, series: &Series) -> VoteTally {
        let votes: Vec<StrategyVote> = self
            .strategies
            .iter()
            .map(|strategy| Self::vote(strategy.as_ref(), series))
            .collect();

        let vote_count = votes.iter().filter(|v| v.is_buy()).count();
        let decision = vote_count >= self.min_votes;

        debug!(
            vote_count,
            total = votes.len(),
            min_votes = self.min_votes,
            decision,
            "votes tallied"
        );

        VoteTally {
            vote_count,
            total: votes.len(),
            decision,
            votes,
        }
    }

    /// Evaluate one strategy, turning any failure into an indeterminate vote.
    fn vote(strategy: &dyn Strategy, series: &Series) -> StrategyVote {
        let name = strategy.name();
        let outcome = catch_unwind(AssertUnwindSafe(|| strategy.evaluate(series)))
            .unwrap_or_else(|payload| {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(IndicatorError::Panicked {
                    strategy: name,
                    message,
                })
            });

        match outcome {
            Ok(reading) => StrategyVote {
                strategy: name,
                status: if reading.fired {
                    VoteStatus::Signal
                } else {
                    VoteStatus::NoSignal
                },
                values: reading.values,
            },
            Err(err) => {
                if err.is_expected() {
                    debug!(strategy = name, kind = err.kind(), error = %err, "strategy indeterminate");
                } else {
                    warn!(strategy = name, kind = err.kind(), error = %err, "strategy failed");
                }
                StrategyVote {
                    strategy: name,
                    status: VoteStatus::Indeterminate {
                        kind: err.kind(),
                        reason: err.to_string(),
                    },
                    values: BTreeMap::new(),
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::{series_from, series_from_closes};
    use crate::strategies::Reading;

    /// Strategy with a canned answer.
    struct Stub {
        name: &'static str,
        outcome: Result<bool, IndicatorError>,
    }

    impl Strategy for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        fn evaluate(&self, _series: &Series) -> Result<Reading, IndicatorError> {
            self.outcome.clone().map(Reading::new)
        }
    }

    struct Panics;

    impl Strategy for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }

        fn evaluate(&self, series: &Series) -> Result<Reading, IndicatorError> {
            let bars = series.bars();
            Ok(Reading::new(bars[bars.len() + 1].close > 0.0))
        }
    }

    fn stubs(votes: &[bool]) -> Vec<Box<dyn Strategy>> {
        votes
            .iter()
            .map(|&v| {
                Box::new(Stub {
                    name: "stub",
                    outcome: Ok(v),
                }) as Box<dyn Strategy>
            })
            .collect()
    }

    #[test]
    fn two_of_six_is_a_buy() {
        let agg = VotingAggregator::new(stubs(&[true, true, false, false, false, false]), 2);
        let tally = agg.evaluate(&series_from_closes(&[1.0]));
        assert_eq!(tally.vote_count, 2);
        assert_eq!(tally.total, 6);
        assert!(tally.decision);
    }

    #[test]
    fn one_of_six_is_not() {
        let agg = VotingAggregator::new(stubs(&[true, false, false, false, false, false]), 2);
        let tally = agg.evaluate(&series_from_closes(&[1.0]));
        assert_eq!(tally.vote_count, 1);
        assert!(!tally.decision);
    }

    #[test]
    fn threshold_is_configurable() {
        let agg = VotingAggregator::new(stubs(&[true, true, false, false, false, false]), 3);
        assert!(!agg.evaluate(&series_from_closes(&[1.0])).decision);
    }

    #[test]
    fn errors_count_as_no_and_do_not_stop_evaluation() {
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(Stub {
                name: "short",
                outcome: Err(IndicatorError::insufficient("short", 201, 1)),
            }),
            Box::new(Panics),
            Box::new(Stub {
                name: "bad_config",
                outcome: Err(IndicatorError::invalid_parameter("bad_config", "period 0")),
            }),
            Box::new(Stub {
                name: "yes_1",
                outcome: Ok(true),
            }),
            Box::new(Stub {
                name: "yes_2",
                outcome: Ok(true),
            }),
        ];
        let agg = VotingAggregator::new(strategies, 2);
        let tally = agg.evaluate(&series_from_closes(&[1.0]));

        assert_eq!(tally.total, 5);
        assert_eq!(tally.vote_count, 2);
        assert!(tally.decision);
        assert!(matches!(
            tally.votes[0].status,
            VoteStatus::Indeterminate {
                kind: "InsufficientHistory",
                ..
            }
        ));
        assert!(matches!(
            tally.votes[1].status,
            VoteStatus::Indeterminate { kind: "Panicked", .. }
        ));
        assert!(matches!(
            tally.votes[2].status,
            VoteStatus::Indeterminate {
                kind: "InvalidParameter",
                ..
            }
        ));
    }

    #[test]
    fn flat_series_gets_no_votes() {
        let series = series_from(&vec![100.0; 300], &vec![1_000; 300]);
        let agg = VotingAggregator::standard(&StrategyParams::default(), 2);
        let tally = agg.evaluate(&series);

        assert_eq!(tally.total, 6);
        assert_eq!(tally.vote_count, 0);
        assert!(!tally.decision);
        // RSI has no defined value on a flat window.
        let rsi = tally.votes.iter().find(|v| v.strategy == "rsi").unwrap();
        assert!(matches!(
            rsi.status,
            VoteStatus::Indeterminate {
                kind: "NumericDegeneracy",
                ..
            }
        ));
    }

    #[test]
    fn short_series_is_all_indeterminate_except_volume() {
        let series = series_from(&[10.0], &[500]);
        let tally = VotingAggregator::standard(&StrategyParams::default(), 2).evaluate(&series);
        let indeterminate = tally
            .votes
            .iter()
            .filter(|v| matches!(v.status, VoteStatus::Indeterminate { .. }))
            .count();
        assert_eq!(indeterminate, 5);
        assert_eq!(tally.vote_count, 0);
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let mut closes: Vec<f64> = (1..=250).map(|x| 100.0 + (x as f64 * 0.2).cos()).collect();
        closes.push(130.0);
        let mut volumes = vec![1_000; 250];
        volumes.push(9_000);
        let series = series_from(&closes, &volumes);

        let agg = VotingAggregator::standard(&StrategyParams::default(), 2);
        let first = agg.evaluate(&series);
        let second = agg.evaluate(&series);
        assert_eq!(first, second);
        // Spike bar: breakout, volume surge and bollinger all agree.
        assert!(first.decision);
    }

    #[test]
    fn vote_serialises_flat() {
        let vote = StrategyVote {
            strategy: "breakout",
            status: VoteStatus::Signal,
            values: BTreeMap::from([("close", 2.0)]),
        };
        let json = serde_json::to_value(&vote).unwrap();
        assert_eq!(json["strategy"], "breakout");
        assert_eq!(json["status"], "signal");
        assert_eq!(json["values"]["close"], 2.0);
    }
}
