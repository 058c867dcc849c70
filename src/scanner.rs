// =============================================================================
// Scan Driver — fetch, score, and report every configured ticker
// =============================================================================
//
// Tickers are fetched through a bounded, order-preserving stream: up to
// `concurrency` requests are in flight, but outcomes are reported strictly
// in ticker-list order.  A ticker whose data cannot be fetched is skipped
// and the scan moves on.  The shutdown future is checked between tickers;
// a ticker is either reported in full or not at all.
// =============================================================================

use std::future::Future;

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::errors::ScanError;
use crate::provider::SeriesProvider;
use crate::runtime_config::ScanConfig;
use crate::scan_outcome::ScanOutcome;
use crate::signals::VotingAggregator;

/// Counters for one scan run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub scan_id: String,
    /// Tickers fetched and scored.
    pub evaluated: usize,
    /// Scored tickers whose decision was a buy.
    pub buys: usize,
    /// Tickers skipped because their data was unavailable.
    pub skipped: usize,
    /// `true` when the shutdown future fired before the list was exhausted.
    pub cancelled: bool,
}

/// Fetch one ticker's history and run the aggregator over it.
pub async fn scan_ticker(
    provider: &dyn SeriesProvider,
    aggregator: &VotingAggregator,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ScanOutcome, ScanError> {
    let series = provider.fetch(ticker, start, end).await?;
    let tally = aggregator.evaluate(&series);

    debug!(
        ticker,
        bars = series.len(),
        votes = tally.vote_count,
        total = tally.total,
        decision = tally.decision,
        "ticker scored"
    );

    Ok(ScanOutcome::new(ticker, &series, tally))
}

/// Scan every ticker in `config`, handing each outcome to `report` in
/// ticker-list order.
pub async fn run_scan<S, R>(
    provider: &dyn SeriesProvider,
    aggregator: &VotingAggregator,
    config: &ScanConfig,
    shutdown: S,
    mut report: R,
) -> ScanSummary
where
    S: Future<Output = ()>,
    R: FnMut(&ScanOutcome),
{
    let mut summary = ScanSummary {
        scan_id: uuid::Uuid::new_v4().to_string(),
        ..ScanSummary::default()
    };
    let span = info_span!("scan", scan_id = %summary.scan_id);

    async move {
        let start = config.start_date;
        let end = config.end_date_or_today();

        info!(
            tickers = config.tickers.len(),
            strategies = aggregator.strategy_count(),
            %start,
            %end,
            min_votes = aggregator.min_votes,
            concurrency = config.concurrency,
            "scan starting"
        );

        let mut outcomes = stream::iter(config.tickers.iter())
            .map(move |ticker| async move {
                let result = scan_ticker(provider, aggregator, ticker, start, end).await;
                (ticker, result)
            })
            .buffered(config.concurrency.max(1));

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    warn!("shutdown requested, stopping scan");
                    summary.cancelled = true;
                    break;
                }

                next = outcomes.next() => match next {
                    None => break,
                    Some((_, Ok(outcome))) => {
                        summary.evaluated += 1;
                        if outcome.decision {
                            summary.buys += 1;
                        }
                        report(&outcome);
                    }
                    Some((ticker, Err(err))) => {
                        summary.skipped += 1;
                        match &err {
                            ScanError::DataUnavailable { reason, .. } if config.strict => {
                                warn!(ticker = %ticker, reason = %reason, "ticker skipped");
                            }
                            ScanError::DataUnavailable { reason, .. } => {
                                debug!(ticker = %ticker, reason = %reason, "ticker skipped");
                            }
                            other => {
                                error!(ticker = %ticker, kind = other.kind(), error = %other, "ticker failed");
                            }
                        }
                    }
                },
            }
        }

        info!(
            evaluated = summary.evaluated,
            buys = summary.buys,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "scan complete"
        );

        summary
    }
    .instrument(span)
    .await
}
