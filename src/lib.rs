//! twquant — TWSE equity indicator & backtest engine.
//!
//! Hexagonal architecture: the pure engine in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
