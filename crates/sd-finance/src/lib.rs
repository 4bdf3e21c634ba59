//! sd-finance
//!
//! Studio income/expense bookkeeping:
//! - `Cents` fixed-point money (no floats anywhere)
//! - income / expense / balance totals
//! - kind filter and running-balance history
//!
//! Pure deterministic logic (no IO, no time).

pub mod fixedpoint;
mod summary;

pub use fixedpoint::{parse_amount, Cents, MoneyError, CENTS_SCALE, MAX_AMOUNT};
pub use summary::{
    balance_history, filter_by_kind, signed_amount, summarize, BalancePoint, FinanceSummary,
    KindFilter,
};
