pub mod txn;

pub use txn::{current_txn_policy, set_txn_policy, TransactionManager, TxnPolicy};
