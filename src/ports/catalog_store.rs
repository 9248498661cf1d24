use crate::domain::{Book, BookId, NewBook};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// カタログストアポート
///
/// 書籍レコードと貸出可否フラグを保持する。
/// 書き込み（`insert`, `set_availability`）は貸出エンジンからのみ呼ばれる。
/// 存在確認以外のバリデーションは行わない。
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// 書籍を登録する
    ///
    /// 新しい`BookId`を採番し、貸出可能な状態で保存する。
    async fn insert(&self, new_book: NewBook) -> Result<Book>;

    /// IDで書籍を取得する
    async fn get(&self, book_id: BookId) -> Result<Option<Book>>;

    /// すべての書籍を登録順に取得する
    async fn list(&self) -> Result<Vec<Book>>;

    /// 貸出可否フラグを更新する
    ///
    /// 書籍が存在しない場合は`None`を返す。
    async fn set_availability(&self, book_id: BookId, is_available: bool) -> Result<Option<Book>>;
}
