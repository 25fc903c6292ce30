//! Account balance reads
//!
//! Balance is informational: a read that cannot be completed yields the
//! `Balance::Unavailable` sentinel instead of failing the caller.

mod reader;


pub use reader::BalanceReader;
