//! Types shared by the profile gateway and the dashboard edit sessions.
//!
//! Everything here crosses the HTTP boundary or has to agree on both sides of
//! it: request/response bodies, the `job_dates` string format and the input
//! rules the gateway re-checks server-side.

pub mod date_range;
pub mod validation;
pub mod wire;

pub use date_range::{DateFields, DateRange, DateRangeError, MonthYear, RangeEnd};
pub use validation::ValidationError;
pub use wire::*;
