//! sd-calendar
//!
//! Calendar bucketing for the studio schedule: month grid, week strip, day
//! agenda and the rolling "upcoming" window.
//!
//! Deterministic, pure logic. No IO, no wall-clock. Callers pass `today` /
//! `now` explicitly; the daemon and CLI read the clock once per request.
//!
//! Every query recomputes from the full appointment list. There is no index
//! or cache; lists are small.

mod engine;
mod types;

pub use engine::{
    days_in_month, days_until, first_weekday, navigate, start_of_week, title, upcoming, Calendar,
};
pub use types::*;
