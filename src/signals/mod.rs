// =============================================================================
// Signals Module
// =============================================================================
//
// Turns the individual strategy votes into a single decision:
// - Voting aggregator (count of agreeing strategies against a threshold)

pub mod voting;

pub use voting::{StrategyVote, VoteStatus, VoteTally, VotingAggregator};
