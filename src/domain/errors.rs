use thiserror::Error;

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BorrowBookError {
    /// 貸出中の書籍
    #[error("book is currently borrowed")]
    Unavailable,
    /// 返却期限が表現可能な日時の範囲外
    #[error("due date is out of range")]
    DueDateOutOfRange,
}

/// 返却のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReturnBookError {
    /// 既に返却済み
    #[error("borrowing is already returned")]
    AlreadyReturned,
    /// 他の利用者の貸出
    #[error("borrowing belongs to another user")]
    NotBorrower,
}
