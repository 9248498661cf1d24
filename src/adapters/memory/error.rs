use crate::domain::BorrowingId;
use thiserror::Error;

/// インメモリストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    /// 返却済みの記録を再度返却しようとした
    #[error("Borrowing {0} is already returned")]
    AlreadyReturned(BorrowingId),
}
