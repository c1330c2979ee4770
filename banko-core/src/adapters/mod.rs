//! Adapter implementations
//!
//! - DuckDB for the bank store (accounts, ledger, loans, audit, staff)

pub mod duckdb;
