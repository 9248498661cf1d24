use crate::domain::{BookId, Borrowing, BorrowingId, NewBorrowing, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出台帳ストアポート
///
/// 貸出記録を追記専用で保持する。記録は削除されない。
///
/// 「書籍ごとに未返却の貸出は高々1件」という制約はエンジン側で守る。
/// ストアはこれを前提にしない。
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 貸出記録を追記する
    ///
    /// IDはストアが単調増加で採番する。
    async fn append(&self, new_borrowing: NewBorrowing) -> Result<Borrowing>;

    /// 書籍の未返却の貸出を検索する
    async fn find_open(&self, book_id: BookId) -> Result<Option<Borrowing>>;

    /// 利用者の未返却の貸出を追記順に取得する
    async fn find_open_by_user(&self, user_id: UserId) -> Result<Vec<Borrowing>>;

    /// 利用者の全貸出（返却済みを含む）を追記順に取得する
    ///
    /// 貸出履歴表示に使用される。
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Borrowing>>;

    /// 全書籍の未返却の貸出を追記順に取得する
    ///
    /// 整合性検査に使用される。
    async fn list_open(&self) -> Result<Vec<Borrowing>>;

    /// 書籍の全貸出（返却済みを含む）を追記順に取得する
    async fn find_by_book(&self, book_id: BookId) -> Result<Vec<Borrowing>>;

    /// 貸出を返却済みにする
    ///
    /// 記録が存在しない場合は`None`を返す。
    /// 既に返却済みの記録は上書きせずエラーを返す。
    async fn mark_returned(
        &self,
        borrowing_id: BorrowingId,
        returned_at: DateTime<Utc>,
    ) -> Result<Option<Borrowing>>;
}
