//! Time-value-of-money projections for SIP, retirement and goal planning,
//! plus the HTTP API that serves them.

pub mod api;
pub mod core;
