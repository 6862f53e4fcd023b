//! Ticket assessment against official arrivals and aggregated hit rates.

mod outcome;
mod summary;

pub use outcome::{assess_market, assess_ticket, MarketOutcome, TicketOutcome};
pub use summary::{BacktestSummary, HitCounts};
