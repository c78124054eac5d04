//! European call pricing on a polynomial normal CDF, plus a two-day
//! delta-hedge simulation built on it.

pub mod config;
pub mod errors;
pub mod hedge;
pub mod models;
pub mod state;
