//! SQLite storage layer.
//!
//! The `chat_turns` store backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod pool;
pub mod turn;
