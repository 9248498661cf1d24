//! Lending ledger for a small book-lending library.
//!
//! The catalog store holds books and their availability flag, the ledger
//! store holds borrowing records, and [`LendingEngine`] is the only writer
//! across both. Reads go through [`QueryFacade`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

pub use application::lending::{LendingEngine, LendingError, OpenBorrowing, QueryFacade};
pub use config::LendingConfig;
