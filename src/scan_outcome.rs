// =============================================================================
// Scan Outcome — per-ticker record of one evaluation
// =============================================================================
//
// One outcome is produced for every ticker whose data could be fetched.  The
// text report only prints outcomes whose decision is a buy; the JSON report
// prints all of them.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::market_data::Series;
use crate::signals::{StrategyVote, VoteTally};

/// Auditable record of how a ticker was scored.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Unique identifier for this evaluation (UUID v4).
    pub id: String,

    /// Ticker as configured (e.g. `BRK.B`, not the provider's spelling).
    pub ticker: String,

    /// Number of strategies that voted buy.
    pub vote_count: usize,

    /// Number of strategies evaluated.
    pub total: usize,

    /// `true` when `vote_count` reached the configured threshold.
    pub decision: bool,

    /// Bars in the evaluated series.
    pub bars: usize,

    /// Date of the most recent bar.
    pub last_date: NaiveDate,

    /// ISO 8601 timestamp of when the outcome was created.
    pub created_at: String,

    pub votes: Vec<StrategyVote>,
}

impl ScanOutcome {
    pub fn new(ticker: impl Into<String>, series: &Series, tally: VoteTally) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ticker: ticker.into(),
            vote_count: tally.vote_count,
            total: tally.total,
            decision: tally.decision,
            bars: series.len(),
            last_date: series.last().date,
            created_at: chrono::Utc::now().to_rfc3339(),
            votes: tally.votes,
        }
    }

    /// The report line for a potential buy, `None` otherwise.
    pub fn buy_line(&self) -> Option<String> {
        self.decision.then(|| {
            format!(
                "{}: Potential BUY ({} out of {} strategies)",
                self.ticker, self.vote_count, self.total
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::series::series_from_closes;
    use crate::signals::VoteStatus;
    use std::collections::BTreeMap;

    fn tally(vote_count: usize, decision: bool) -> VoteTally {
        VoteTally {
            vote_count,
            total: 6,
            decision,
            votes: vec![StrategyVote {
                strategy: "breakout",
                status: VoteStatus::Signal,
                values: BTreeMap::new(),
            }],
        }
    }

    #[test]
    fn buy_line_matches_report_format() {
        let series = series_from_closes(&[1.0, 2.0]);
        let outcome = ScanOutcome::new("AAPL", &series, tally(3, true));
        assert_eq!(
            outcome.buy_line().as_deref(),
            Some("AAPL: Potential BUY (3 out of 6 strategies)")
        );
    }

    #[test]
    fn no_line_without_decision() {
        let series = series_from_closes(&[1.0, 2.0]);
        let outcome = ScanOutcome::new("MSFT", &series, tally(1, false));
        assert_eq!(outcome.buy_line(), None);
    }

    #[test]
    fn serialises_with_dates_and_votes() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let outcome = ScanOutcome::new("BRK.B", &series, tally(2, true));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["ticker"], "BRK.B");
        assert_eq!(json["bars"], 3);
        assert_eq!(json["last_date"], "2023-01-04");
        assert_eq!(json["votes"][0]["status"], "signal");
        assert_eq!(json["id"].as_str().map(str::len), Some(36));
    }
}
