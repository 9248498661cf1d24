use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{Book, BookId, BorrowBookError, BorrowingId, ReturnBookError, UserId};

/// 貸出期間（日数）
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// 貸出記録 - 1冊の書籍の1回の貸出
///
/// 台帳は追記専用。記録は返却時に一度だけ更新され（`returned_at`の設定）、
/// 削除されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrowing {
    pub borrowing_id: BorrowingId,
    pub book_id: BookId,
    pub user_id: UserId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// `None` は未返却（貸出中）
    pub returned_at: Option<DateTime<Utc>>,
}

impl Borrowing {
    /// 未返却か
    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// 台帳への追記データ（IDは台帳ストアが採番する）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBorrowing {
    pub book_id: BookId,
    pub user_id: UserId,
    pub borrowed_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

impl NewBorrowing {
    pub fn into_borrowing(self, borrowing_id: BorrowingId) -> Borrowing {
        Borrowing {
            borrowing_id,
            book_id: self.book_id,
            user_id: self.user_id,
            borrowed_at: self.borrowed_at,
            due_date: self.due_date,
            returned_at: None,
        }
    }
}

/// 純粋関数：返却期限を計算する
///
/// 表現可能な日時の範囲を超える場合は`None`。
pub fn due_date_for(borrowed_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    borrowed_at.checked_add_signed(Duration::days(LOAN_PERIOD_DAYS))
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 貸出可能な書籍のみ貸し出せる
/// - 貸出期間は14日間（返却期限が表現可能な日時であること）
///
/// 副作用なし。台帳に追記すべき新しい貸出を返す。
pub fn borrow_book(
    book: &Book,
    user_id: UserId,
    borrowed_at: DateTime<Utc>,
) -> Result<NewBorrowing, BorrowBookError> {
    if !book.is_available {
        return Err(BorrowBookError::Unavailable);
    }

    let due_date = due_date_for(borrowed_at).ok_or(BorrowBookError::DueDateOutOfRange)?;

    Ok(NewBorrowing {
        book_id: book.book_id,
        user_id,
        borrowed_at,
        due_date,
    })
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの貸出は返却できない
/// - 本人の貸出のみ返却できる
/// - 延滞していても返却は受け付ける（延滞料金なし）
///
/// 副作用なし。返却後の貸出を返す。
pub fn return_borrowing(
    borrowing: &Borrowing,
    user_id: UserId,
    returned_at: DateTime<Utc>,
) -> Result<Borrowing, ReturnBookError> {
    if !borrowing.is_open() {
        return Err(ReturnBookError::AlreadyReturned);
    }

    if borrowing.user_id != user_id {
        return Err(ReturnBookError::NotBorrower);
    }

    Ok(Borrowing {
        returned_at: Some(returned_at),
        ..borrowing.clone()
    })
}

/// 純粋関数：延滞判定
pub fn is_overdue(borrowing: &Borrowing, now: DateTime<Utc>) -> bool {
    borrowing.is_open() && now > borrowing.due_date
}
