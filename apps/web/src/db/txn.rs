use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::warn;

use crate::error::AppError;
use crate::orm::SessionFactory;

/// What a successful unit of work does with its transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnPolicy {
    /// Commit (default).
    CommitOnOk,
    /// Roll back, so test suites can exercise writes without keeping them.
    RollbackOnOk,
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

/// `CommitOnOk` unless a policy was set for this process.
pub fn current_txn_policy() -> TxnPolicy {
    POLICY.get().copied().unwrap_or(TxnPolicy::CommitOnOk)
}

/// Set the policy for the process. Only the first call has any effect.
pub fn set_txn_policy(policy: TxnPolicy) {
    let _ = POLICY.set(policy);
}

/// Boxed unit of work borrowed against one transaction.
pub type TxnFuture<'c, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + 'c>>;

/// Runs units of work in a transaction on the session factory's connection.
#[derive(Debug, Clone)]
pub struct TransactionManager {
    conn: DatabaseConnection,
}

impl TransactionManager {
    pub fn new(session: &SessionFactory) -> Self {
        Self {
            conn: session.connection().clone(),
        }
    }

    /// Execute `f` within a database transaction.
    ///
    /// On `Ok` the current [`TxnPolicy`] decides between commit and rollback;
    /// on `Err` the transaction is rolled back and the original error returned.
    pub async fn with_txn<R, F>(&self, f: F) -> Result<R, AppError>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxnFuture<'c, R>,
    {
        let txn = self.conn.begin().await?;
        let out = f(&txn).await;

        match out {
            Ok(val) => {
                match current_txn_policy() {
                    TxnPolicy::CommitOnOk => txn.commit().await?,
                    TxnPolicy::RollbackOnOk => txn.rollback().await?,
                }
                Ok(val)
            }
            Err(err) => {
                // Best-effort rollback; preserve original error
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("txn=rollback_failed error={rollback_err}");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults_to_commit() {
        // Nothing in the library's own tests sets a policy.
        assert_eq!(current_txn_policy(), TxnPolicy::CommitOnOk);
    }
}
