//! Utility functions and constants

pub mod constants;
pub mod format;

pub use format::{format_balance, format_chain_as_num};
