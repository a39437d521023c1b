//! The directory store engine.
//!
//! Everything here is independent of process environment and terminal I/O:
//! configuration arrives by parameter and results are returned, not printed.

pub mod codec;
pub mod entry;
pub mod error;
pub mod maintenance;
pub mod matcher;
pub mod ops;
pub mod query;
pub mod ranker;
pub mod store;
pub mod time;
