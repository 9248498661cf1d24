use crate::domain::{Book, Borrowing};

use super::errors::LendingError;

/// 不整合を記録してエラーに変換する
///
/// 検出した時点でログに残す。呼び出し側は処理を中断すること。
pub(super) fn invariant_violation(message: String) -> LendingError {
    tracing::error!(%message, "Catalog and ledger disagree");
    LendingError::InvariantViolation(message)
}

/// 貸出可否フラグと台帳の未返却の貸出が一致しているか検証する
///
/// 真実の源は台帳。フラグはそのキャッシュにすぎないため、
/// 食い違いは利用者向けのエラーではなくデータ破損として扱う。
pub(super) fn ensure_flag_matches_ledger(
    book: &Book,
    open: Option<&Borrowing>,
) -> Result<(), LendingError> {
    match (book.is_available, open) {
        (true, Some(borrowing)) => Err(invariant_violation(format!(
            "book {} is flagged available but has open borrowing {}",
            book.book_id, borrowing.borrowing_id
        ))),
        (false, None) => Err(invariant_violation(format!(
            "book {} is flagged unavailable but has no open borrowing",
            book.book_id
        ))),
        _ => Ok(()),
    }
}
