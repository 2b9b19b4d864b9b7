//! Cumulative unread accounting.

pub mod ledger;
