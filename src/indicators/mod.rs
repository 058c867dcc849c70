// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free numeric building blocks used by the strategies.
// Inputs are borrowed slices; every derived series is owned by the caller of
// the function that produced it.  Insufficient data yields an empty vec,
// NaN warm-up values, or `None`, never a panic.

pub mod bollinger;
pub mod ema;
pub mod rolling;
pub mod rsi;
