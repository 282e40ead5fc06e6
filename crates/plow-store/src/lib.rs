//! # Plow Store
//!
//! 交易式記憶體儲存實作

pub mod memory;

pub use memory::{MemoryDatabase, MemoryTx};
