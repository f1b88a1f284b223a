//! Transaction risk analytics: a deterministic scoring pipeline over a window
//! of bank transactions, plus the service facade and HTTP surface around it.

pub mod analytics;
pub mod config;
pub mod error;
pub mod telemetry;
