//! Connection ledger and server counter reconciliation.

pub mod ledger;
pub mod reconciler;

pub use ledger::{ConnectOutcome, ConnectionLedger};
pub use reconciler::CounterReconciler;
