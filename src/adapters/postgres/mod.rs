//! PostgreSQL adapters - Database implementations for storage ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresSessionRecords` - Remote session table with a LISTEN/NOTIFY change feed

mod session_records;

pub use session_records::{PostgresSessionRecords, CHANGE_CHANNEL};
