// Swipe workflow: match scoring, next-job selection, decline ledger, apply.

pub mod handlers;
pub mod ledger;
#[cfg(test)]
pub mod memory;
pub mod preferences;
pub mod scorer;
pub mod selector;
pub mod store;
