use crate::domain::{BookId, UserId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 貸出台帳アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LendingError {
    /// 書籍が存在しない
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// 利用者が存在しない
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// (書籍, 利用者) に一致する未返却の貸出がない
    #[error("No open borrowing of book {book_id} by user {user_id}")]
    BorrowingNotFound { book_id: BookId, user_id: UserId },

    /// 書籍が貸出中
    #[error("Book is not available: {0}")]
    Unavailable(BookId),

    /// 貸出日時から返却期限を計算できない（表現可能な日時の範囲外）
    #[error("Borrow date out of range: {0}")]
    InvalidBorrowDate(DateTime<Utc>),

    /// カタログと台帳の不整合（データ破損）
    ///
    /// 不具合として扱う。自動修復・自動リトライはしない。
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// CatalogStoreのエラー
    #[error("Catalog store error")]
    CatalogStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// LedgerStoreのエラー
    #[error("Ledger store error")]
    LedgerStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IdentityProviderのエラー
    #[error("Identity provider error")]
    IdentityProviderError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LendingError {
    /// 参照先（書籍・利用者・未返却の貸出）が存在しないエラーか
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LendingError::BookNotFound(_)
                | LendingError::UserNotFound(_)
                | LendingError::BorrowingNotFound { .. }
        )
    }

    /// 利用者の操作に起因する回復可能なエラーか
    pub fn is_recoverable(&self) -> bool {
        self.is_not_found()
            || matches!(
                self,
                LendingError::Unavailable(_) | LendingError::InvalidBorrowDate(_)
            )
    }

    /// 表示層向けのメッセージ
    ///
    /// 内部エラーの詳細はログに記録し、利用者には一般的なメッセージのみを返す。
    pub fn user_message(&self) -> String {
        match self {
            LendingError::BookNotFound(_) => "Book not found".to_string(),
            LendingError::UserNotFound(_) => "User not found".to_string(),
            LendingError::BorrowingNotFound { .. } => "Borrowing record not found".to_string(),
            LendingError::Unavailable(_) => "Book is already borrowed".to_string(),
            LendingError::InvalidBorrowDate(_) => "Borrow date out of range".to_string(),
            _ => "An unexpected error occurred".to_string(),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LendingError>;
